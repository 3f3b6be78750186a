//! Geometry helpers for positioning overlays over readable elements.
//!
//! Two coordinate spaces are involved:
//!
//! | Space | Origin | Source |
//! |-------|--------|--------|
//! | viewport | top-left of the visible area | [`LayoutView::bounding_client_rect`] |
//! | document | top-left of the page | viewport + [`LayoutView::scroll_offset`] |
//!
//! Overlays are positioned in document space so they stay attached to
//! their element while the page scrolls. Hit testing uses viewport space,
//! which is what pointer events report.

use serde::{Deserialize, Serialize};

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Current scroll position of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// An element's border box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

/// An element's box in document coordinates.
///
/// `x`/`y` mirror `left`/`top` so callers can use either naming.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Line height used when `line-height: normal`, as a multiple of font size.
pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

/// The typography subset of an element's computed style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedStyle {
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    /// Raw CSS value, e.g. `24px`, `1.5`, `150%`, `normal`.
    pub line_height: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 16.0,
            font_weight: "400".to_string(),
            font_style: "normal".to_string(),
            line_height: "normal".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Line height in pixels, or `None` when the value cannot be parsed.
    pub fn resolved_line_height(&self) -> Option<f64> {
        resolve_line_height(&self.line_height, self.font_size)
    }
}

/// Resolve a CSS `line-height` value to pixels.
///
/// Unitless numbers and percentages scale with `font_size`; `normal` is
/// [`NORMAL_LINE_HEIGHT`] times the font size.
pub fn resolve_line_height(value: &str, font_size: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if value == "normal" {
        return Some(font_size * NORMAL_LINE_HEIGHT);
    }

    let (number, scale) = if let Some(px) = value.strip_suffix("px") {
        (px, 1.0)
    } else if let Some(rem) = value.strip_suffix("rem") {
        // Root font size is not tracked; browsers default it to 16px.
        (rem, 16.0)
    } else if let Some(em) = value.strip_suffix("em") {
        (em, font_size)
    } else if let Some(pct) = value.strip_suffix('%') {
        (pct, font_size / 100.0)
    } else {
        (value.as_str(), font_size)
    };

    let parsed: f64 = number.trim().parse().ok()?;
    if !parsed.is_finite() || parsed < 0.0 {
        return None;
    }
    Some(parsed * scale)
}

/// Layout queries against a rendered document.
///
/// Implementations answer from live layout; results must not be cached
/// across scroll or resize.
pub trait LayoutView<N> {
    /// Border box relative to the viewport.
    fn bounding_client_rect(&self, node: N) -> Rect;

    fn scroll_offset(&self) -> ScrollOffset;

    fn computed_style(&self, node: N) -> ComputedStyle;

    /// Rendered text of the element and its descendants.
    fn text_content(&self, node: N) -> String;
}

/// Measures the rendered height of a single unwrapped line of text.
pub trait TextMeasurer {
    fn line_box_height(&self, text: &str, style: &ComputedStyle) -> f64;
}

/// Document-space bounds of an element.
pub fn element_bounds<N, L>(view: &L, node: N) -> Bounds
where
    L: LayoutView<N> + ?Sized,
{
    let rect = view.bounding_client_rect(node);
    let scroll = view.scroll_offset();
    let top = rect.top + scroll.y;
    let left = rect.left + scroll.x;

    Bounds {
        x: left,
        y: top,
        top,
        left,
        width: rect.width,
        height: rect.height,
    }
}

/// Whether a viewport point lies within the element's box, edges included.
pub fn is_point_inside_element<N, L>(point: Point, view: &L, node: N) -> bool
where
    L: LayoutView<N> + ?Sized,
{
    view.bounding_client_rect(node).contains(point)
}

/// Height of the line box holding the element's first line of text.
///
/// The first line is the text content up to the first newline, measured
/// with the element's font and line-height. Returns `0.0` if that line is
/// empty or only whitespace, which a browser collapses to nothing.
pub fn line_height_of_first_line<N, L, M>(view: &L, measurer: &M, node: N) -> f64
where
    N: Copy,
    L: LayoutView<N> + ?Sized,
    M: TextMeasurer + ?Sized,
{
    let text = view.text_content(node);
    let first_line = text.split('\n').next().unwrap_or_default();
    if first_line.trim().is_empty() {
        return 0.0;
    }

    let style = view.computed_style(node);
    measurer.line_box_height(first_line, &style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeadlessMeasurer, StaticLayout};

    fn style_with(line_height: &str, font_size: f64) -> ComputedStyle {
        ComputedStyle {
            font_size,
            line_height: line_height.to_string(),
            ..ComputedStyle::default()
        }
    }

    #[test]
    fn rect_edges_are_inside() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(110.0, 70.0)));
        assert!(rect.contains(Point::new(10.0, 45.0)));
        assert!(!rect.contains(Point::new(9.999, 45.0)));
        assert!(!rect.contains(Point::new(60.0, 70.001)));
    }

    #[test]
    fn point_on_element_edge_is_inside() {
        let layout = StaticLayout::new();
        layout.insert(1_u32, Rect::new(5.0, 5.0, 10.0, 10.0), ComputedStyle::default(), "x");
        assert!(is_point_inside_element(Point::new(5.0, 7.0), &layout, 1));
        assert!(is_point_inside_element(Point::new(15.0, 15.0), &layout, 1));
        assert!(!is_point_inside_element(Point::new(15.5, 15.0), &layout, 1));
    }

    #[test]
    fn bounds_add_scroll_offset() {
        let layout = StaticLayout::new();
        layout.insert(7_u32, Rect::new(30.0, 40.0, 200.0, 60.0), ComputedStyle::default(), "x");

        let at_origin = element_bounds(&layout, 7);
        assert_eq!(at_origin.top, 40.0);
        assert_eq!(at_origin.left, 30.0);
        assert_eq!(at_origin.x, at_origin.left);
        assert_eq!(at_origin.y, at_origin.top);

        layout.set_scroll(ScrollOffset { x: 12.0, y: 300.0 });
        let scrolled = element_bounds(&layout, 7);
        assert_eq!(scrolled.top - at_origin.top, 300.0);
        assert_eq!(scrolled.left - at_origin.left, 12.0);
        assert_eq!(scrolled.width, at_origin.width);
        assert_eq!(scrolled.height, at_origin.height);
    }

    #[test]
    fn line_height_units_resolve() {
        assert_eq!(resolve_line_height("24px", 16.0), Some(24.0));
        assert_eq!(resolve_line_height("1.5", 16.0), Some(24.0));
        assert_eq!(resolve_line_height("150%", 20.0), Some(30.0));
        assert_eq!(resolve_line_height("2em", 10.0), Some(20.0));
        assert_eq!(resolve_line_height("1rem", 10.0), Some(16.0));
        assert_eq!(resolve_line_height("NORMAL", 20.0), Some(24.0));
        assert_eq!(resolve_line_height("inherit", 16.0), None);
        assert_eq!(resolve_line_height("-3px", 16.0), None);
        assert_eq!(resolve_line_height("", 16.0), None);
    }

    #[test]
    fn first_line_height_uses_measurer() {
        struct FixedMeasurer;
        impl TextMeasurer for FixedMeasurer {
            fn line_box_height(&self, text: &str, _style: &ComputedStyle) -> f64 {
                assert_eq!(text, "First line");
                42.0
            }
        }

        let layout = StaticLayout::new();
        layout.insert(1_u32, Rect::default(), style_with("18px", 14.0), "First line\nSecond line");
        assert_eq!(line_height_of_first_line(&layout, &FixedMeasurer, 1), 42.0);
    }

    #[test]
    fn first_line_height_is_zero_without_text() {
        let layout = StaticLayout::new();
        layout.insert(1_u32, Rect::default(), style_with("18px", 14.0), "");
        layout.insert(2_u32, Rect::default(), style_with("18px", 14.0), "\nsecond");
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 1), 0.0);
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 2), 0.0);
    }

    #[test]
    fn whitespace_first_line_has_no_height() {
        let layout = StaticLayout::new();
        layout.insert(1_u32, Rect::default(), ComputedStyle::default(), "   \nbody");
        layout.insert(2_u32, Rect::default(), ComputedStyle::default(), "\t \r\nbody");
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 1), 0.0);
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 2), 0.0);
    }

    #[test]
    fn headless_first_line_height_follows_style() {
        let layout = StaticLayout::new();
        layout.insert(1_u32, Rect::default(), style_with("28px", 16.0), "Line\nmore");
        layout.insert(2_u32, Rect::default(), style_with("normal", 20.0), "Line");
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 1), 28.0);
        assert_eq!(line_height_of_first_line(&layout, &HeadlessMeasurer, 2), 24.0);
    }
}
