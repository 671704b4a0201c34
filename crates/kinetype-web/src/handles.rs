#![forbid(unsafe_code)]

//! Mapping between host objects and [`ElementId`] handles.

use kinetype_core::ElementId;

/// Interns host objects and hands out stable [`ElementId`]s.
///
/// Ids start at 1 and are never reused. Lookup by object is linear, which
/// is fine for the few dozen elements a page animates.
#[derive(Debug, Clone)]
pub struct HandleTable<T> {
    entries: Vec<T>,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PartialEq + Clone> HandleTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `value`, allocating one on first sight.
    pub fn intern(&mut self, value: &T) -> ElementId {
        if let Some(id) = self.find(value) {
            return id;
        }
        self.entries.push(value.clone());
        ElementId(self.entries.len() as u64)
    }

    /// Id for `value` if it was interned before.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<ElementId> {
        self.entries
            .iter()
            .position(|e| e == value)
            .map(|idx| ElementId(idx as u64 + 1))
    }

    /// Object behind `id`.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        let idx = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.entries.get(idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
