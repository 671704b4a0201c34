//! In-memory element tree implementing [`Document`].
//!
//! # Layout model
//!
//! Each element has a natural size derived from its text content:
//! `width = widest line × cell width`, `height = line count × line height`,
//! where line width is measured in terminal-style display columns (CJK glyphs
//! count two). Inline `width`/`height` in px override the natural size, and
//! `min-width`/`min-height` in px clamp it from below. That is enough to make
//! reflow visible: scrambling Latin text with CJK glyphs grows an unlocked box
//! and leaves a locked one untouched.
//!
//! An explicit [`MemoryDocument::set_natural_size`] replaces the text-derived
//! measurement for elements whose size should not depend on content.

use std::collections::HashMap;

use kinetype_core::geometry::parse_px;
use kinetype_core::{BoxSize, Document, ElementId, StyleProp};
use kinetype_text::extract_text;
use unicode_width::UnicodeWidthChar;

use crate::selector::{SelectorHost, SelectorList};

/// Pixel metrics of the text layout model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Width of one display column.
    pub cell_width: f64,
    /// Height of one line.
    pub line_height: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    attached: bool,
    attributes: Vec<(String, String)>,
    markup: String,
    natural: Option<BoxSize>,
    styles: HashMap<StyleProp, String>,
    markup_writes: usize,
    style_writes: usize,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            attached: true,
            attributes: Vec::new(),
            markup: String::new(),
            natural: None,
            styles: HashMap::new(),
            markup_writes: 0,
            style_writes: 0,
        }
    }
}

/// In-memory document.
///
/// Element handles are allocated sequentially; creation order is document
/// order. Element `#1` is the `<body>`.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    metrics: LayoutMetrics,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_metrics(LayoutMetrics::default())
    }

    /// Create a document with custom layout metrics.
    #[must_use]
    pub fn with_metrics(metrics: LayoutMetrics) -> Self {
        Self {
            nodes: vec![Node::new("body", None)],
            metrics,
        }
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> ElementId {
        ElementId(1)
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        let idx = usize::try_from(el.0).ok()?.checked_sub(1)?;
        self.nodes.get(idx)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        let idx = usize::try_from(el.0).ok()?.checked_sub(1)?;
        self.nodes.get_mut(idx)
    }

    /// Append a new element under `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        self.nodes.push(Node::new(tag, Some(parent)));
        ElementId(self.nodes.len() as u64)
    }

    /// Set the `class` attribute.
    pub fn set_class(&mut self, el: ElementId, class: &str) {
        self.set_attribute(el, "class", class);
    }

    /// Replace content without counting it as an engine write.
    pub fn set_markup(&mut self, el: ElementId, markup: &str) {
        if let Some(node) = self.node_mut(el) {
            node.markup = markup.to_string();
        }
    }

    /// Pin the natural size instead of deriving it from text.
    pub fn set_natural_size(&mut self, el: ElementId, size: BoxSize) {
        if let Some(node) = self.node_mut(el) {
            node.natural = Some(size);
        }
    }

    /// Remove `el` (and so its subtree) from the render tree.
    pub fn detach(&mut self, el: ElementId) {
        if let Some(node) = self.node_mut(el) {
            node.attached = false;
        }
    }

    /// Number of [`Document::set_inner_markup`] calls on `el`.
    #[must_use]
    pub fn markup_writes(&self, el: ElementId) -> usize {
        self.node(el).map_or(0, |n| n.markup_writes)
    }

    /// Number of [`Document::set_style`] calls on `el`.
    #[must_use]
    pub fn style_writes(&self, el: ElementId) -> usize {
        self.node(el).map_or(0, |n| n.style_writes)
    }

    /// Every inline style currently set on `el`, sorted by CSS name.
    #[must_use]
    pub fn inline_styles(&self, el: ElementId) -> Vec<(&'static str, String)> {
        let mut out: Vec<_> = self
            .node(el)
            .map(|n| {
                n.styles
                    .iter()
                    .map(|(prop, value)| (prop.css_name(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Plain text currently rendered in `el`.
    #[must_use]
    pub fn text(&self, el: ElementId) -> String {
        self.node(el)
            .map(|n| extract_text(&n.markup))
            .unwrap_or_default()
    }

    fn text_size(&self, markup: &str) -> BoxSize {
        let text = extract_text(markup);
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            lines += 1;
            let cols: usize = line.chars().map(|c| c.width().unwrap_or(0)).sum();
            widest = widest.max(cols);
        }
        BoxSize::new(
            widest as f64 * self.metrics.cell_width,
            lines as f64 * self.metrics.line_height,
        )
    }

    fn px_style(node: &Node, prop: StyleProp) -> Option<f64> {
        node.styles.get(&prop).and_then(|v| parse_px(v))
    }

    fn compile(selector: &str) -> Option<SelectorList> {
        SelectorList::parse(selector).ok()
    }
}

impl SelectorHost for MemoryDocument {
    type Handle = ElementId;

    fn tag(&self, el: ElementId) -> &str {
        self.node(el).map_or("", |n| n.tag.as_str())
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el)?.parent
    }
}

impl Document for MemoryDocument {
    /// Invalid selectors match nothing, as `querySelectorAll` would throw and
    /// the effects treat that as "no elements".
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(list) = Self::compile(selector) else {
            return Vec::new();
        };
        (1..=self.nodes.len() as u64)
            .map(ElementId)
            .filter(|el| self.is_connected(*el) && list.matches(self, *el))
            .collect()
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let list = Self::compile(selector)?;
        let mut cursor = self.node(element).map(|_| element);
        while let Some(el) = cursor {
            if list.matches(self, el) {
                return Some(el);
            }
            cursor = SelectorHost::parent(self, el);
        }
        None
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let mut cursor = Some(element);
        while let Some(el) = cursor {
            match self.node(el) {
                Some(node) if node.attached => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn inner_markup(&self, element: ElementId) -> Option<String> {
        self.node(element).map(|n| n.markup.clone())
    }

    fn set_inner_markup(&mut self, element: ElementId, markup: &str) {
        if let Some(node) = self.node_mut(element) {
            node.markup = markup.to_string();
            node.markup_writes += 1;
        }
    }

    fn bounding_size(&self, element: ElementId) -> Option<BoxSize> {
        if !self.is_connected(element) {
            return None;
        }
        let node = self.node(element)?;
        let natural = node.natural.unwrap_or_else(|| self.text_size(&node.markup));
        let width = Self::px_style(node, StyleProp::Width).unwrap_or(natural.width);
        let height = Self::px_style(node, StyleProp::Height).unwrap_or(natural.height);
        let min_width = Self::px_style(node, StyleProp::MinWidth).unwrap_or(0.0);
        let min_height = Self::px_style(node, StyleProp::MinHeight).unwrap_or(0.0);
        Some(BoxSize::new(width.max(min_width), height.max(min_height)))
    }

    fn style(&self, element: ElementId, prop: StyleProp) -> String {
        self.node(element)
            .and_then(|n| n.styles.get(&prop).cloned())
            .unwrap_or_default()
    }

    fn set_style(&mut self, element: ElementId, prop: StyleProp, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.style_writes += 1;
            if value.is_empty() {
                node.styles.remove(&prop);
            } else {
                node.styles.insert(prop, value.to_string());
            }
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        SelectorHost::attr(self, element, name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match node.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attributes.push((name, value.to_string())),
        }
    }
}
