//! In-memory layout for headless use.
//!
//! [`StaticLayout`] answers [`LayoutView`] queries from recorded boxes
//! instead of a rendering engine. It can be filled by hand or from a JSON
//! [`LayoutFixture`] whose boxes are matched to elements by CSS selector:
//!
//! ```json
//! {
//!   "scroll": { "x": 0, "y": 120 },
//!   "boxes": [
//!     {
//!       "selector": "#intro",
//!       "rect": { "left": 40, "top": 80, "width": 600, "height": 72 },
//!       "style": { "fontSize": 16, "lineHeight": "24px" }
//!     }
//!   ]
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::path::Path;

use scraper::ElementRef;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{ComputedStyle, LayoutView, Rect, ScrollOffset, TextMeasurer, NORMAL_LINE_HEIGHT};
use crate::tree::{DocumentTree, HtmlTree};

#[derive(Debug, Clone)]
struct LayoutBox<N> {
    node: N,
    rect: Rect,
    style: ComputedStyle,
    text: String,
}

/// Recorded layout boxes plus a scroll position.
///
/// Elements without a recorded box report an empty rect at the origin,
/// the default style, and no text.
#[derive(Debug)]
pub struct StaticLayout<N> {
    boxes: RefCell<Vec<LayoutBox<N>>>,
    scroll: Cell<ScrollOffset>,
}

impl<N: Copy + PartialEq> StaticLayout<N> {
    pub fn new() -> Self {
        Self {
            boxes: RefCell::new(Vec::new()),
            scroll: Cell::new(ScrollOffset::default()),
        }
    }

    /// Record (or replace) the box for `node`.
    pub fn insert(&self, node: N, rect: Rect, style: ComputedStyle, text: impl Into<String>) {
        let entry = LayoutBox {
            node,
            rect,
            style,
            text: text.into(),
        };
        let mut boxes = self.boxes.borrow_mut();
        match boxes.iter_mut().find(|b| b.node == node) {
            Some(existing) => *existing = entry,
            None => boxes.push(entry),
        }
    }

    pub fn set_scroll(&self, scroll: ScrollOffset) {
        self.scroll.set(scroll);
    }

    pub fn len(&self) -> usize {
        self.boxes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.borrow().is_empty()
    }

    fn with_box<R>(&self, node: N, f: impl FnOnce(Option<&LayoutBox<N>>) -> R) -> R {
        let boxes = self.boxes.borrow();
        f(boxes.iter().find(|b| b.node == node))
    }
}

impl<N: Copy + PartialEq> Default for StaticLayout<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + PartialEq> LayoutView<N> for StaticLayout<N> {
    fn bounding_client_rect(&self, node: N) -> Rect {
        self.with_box(node, |b| b.map(|b| b.rect).unwrap_or_default())
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll.get()
    }

    fn computed_style(&self, node: N) -> ComputedStyle {
        self.with_box(node, |b| b.map(|b| b.style.clone()).unwrap_or_default())
    }

    fn text_content(&self, node: N) -> String {
        self.with_box(node, |b| b.map(|b| b.text.clone()).unwrap_or_default())
    }
}

/// Serialized layout: a scroll position and selector-addressed boxes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutFixture {
    #[serde(default)]
    pub scroll: ScrollOffset,
    #[serde(default)]
    pub boxes: Vec<FixtureBox>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureBox {
    pub selector: String,
    pub rect: Rect,
    #[serde(default)]
    pub style: ComputedStyle,
}

impl LayoutFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Resolve every box against `tree`.
    ///
    /// A selector matching several elements gives each the same box; one
    /// matching nothing is skipped with a warning. Later boxes override
    /// earlier ones for the same element.
    pub fn resolve<'t>(&self, tree: &'t HtmlTree) -> Result<StaticLayout<ElementRef<'t>>> {
        let layout = StaticLayout::new();
        layout.set_scroll(self.scroll);

        for fixture_box in &self.boxes {
            let matches = tree.select(&fixture_box.selector)?;
            if matches.is_empty() {
                warn!(selector = %fixture_box.selector, "layout box matched no element");
                continue;
            }
            for node in matches {
                layout.insert(node, fixture_box.rect, fixture_box.style.clone(), tree.text_content(node));
            }
        }

        debug!(boxes = layout.len(), "resolved layout fixture");
        Ok(layout)
    }
}

/// Measures line boxes without a renderer.
///
/// A single non-wrapping line box is exactly as tall as its resolved
/// line-height, whatever the glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessMeasurer;

impl TextMeasurer for HeadlessMeasurer {
    fn line_box_height(&self, _text: &str, style: &ComputedStyle) -> f64 {
        style
            .resolved_line_height()
            .unwrap_or(style.font_size * NORMAL_LINE_HEIGHT)
    }
}
