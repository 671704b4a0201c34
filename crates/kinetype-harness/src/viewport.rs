//! Recording [`ViewportObserver`].

use std::collections::BTreeMap;

use kinetype_core::{ElementId, IntersectionEntry, ViewportObserver};

/// One call made against the viewport observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCall {
    Observe { element: ElementId, threshold: f64 },
    Unobserve { element: ElementId },
}

/// Viewport observer that remembers what is armed.
///
/// Tests call [`report`](MemoryViewport::report) to build the intersection
/// entries a browser would deliver; nothing is delivered for elements that are
/// not observed.
#[derive(Debug, Clone, Default)]
pub struct MemoryViewport {
    observed: BTreeMap<ElementId, f64>,
    calls: Vec<ViewportCall>,
}

impl MemoryViewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `element` is currently observed.
    #[must_use]
    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    /// Threshold `element` was armed with.
    #[must_use]
    pub fn threshold(&self, element: ElementId) -> Option<f64> {
        self.observed.get(&element).copied()
    }

    /// Currently observed elements, in handle order.
    #[must_use]
    pub fn observed(&self) -> Vec<ElementId> {
        self.observed.keys().copied().collect()
    }

    /// Every call made so far.
    #[must_use]
    pub fn calls(&self) -> &[ViewportCall] {
        &self.calls
    }

    /// Intersection entry for `element` at `ratio`, if it is observed.
    #[must_use]
    pub fn report(&self, element: ElementId, ratio: f64) -> Option<IntersectionEntry> {
        self.is_observed(element)
            .then(|| IntersectionEntry::from_ratio(element, ratio))
    }
}

impl ViewportObserver for MemoryViewport {
    fn observe(&mut self, element: ElementId, threshold: f64) {
        self.observed.insert(element, threshold);
        self.calls.push(ViewportCall::Observe { element, threshold });
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observed.remove(&element);
        self.calls.push(ViewportCall::Unobserve { element });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_then_unobserve() {
        let mut vp = MemoryViewport::new();
        let el = ElementId(4);
        vp.observe(el, 0.15);
        assert_eq!(vp.threshold(el), Some(0.15));
        assert!(vp.report(el, 0.2).is_some());
        vp.unobserve(el);
        assert!(!vp.is_observed(el));
        assert!(vp.report(el, 0.2).is_none());
        assert_eq!(vp.calls().len(), 2);
    }
}
