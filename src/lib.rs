//! `readably` - Readable-block detection and hover geometry for HTML documents
//!
//! # Features
//!
//! - **Classification**: reduces a document to its top-level readable
//!   elements (one per distinct block of text)
//! - **Geometry**: document-space bounds, inclusive hit testing, first-line
//!   height measurement
//! - **Hover tracking**: a pointer-driven state machine publishing the
//!   hovered block's overlay position
//!
//! # Example
//!
//! ```rust
//! use readably::{Classifier, HtmlTree};
//!
//! let tree = HtmlTree::parse("<div><blockquote>Some text here</blockquote></div>");
//! let readable = Classifier::default().classify(&tree, tree.body());
//! assert_eq!(readable.len(), 1);
//! assert_eq!(readable[0].value().name(), "blockquote");
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hover;
pub mod layout;
pub mod tree;

pub use classify::{Classifier, ExclusionList, DEFAULT_EXCLUSIONS};
pub use config::{load_config, load_config_from, Config};
pub use error::{ReadablyError, Result};
pub use geometry::{
    element_bounds, is_point_inside_element, line_height_of_first_line, Bounds, ComputedStyle,
    LayoutView, Point, Rect, ScrollOffset, TextMeasurer,
};
pub use hover::{
    EventSource, HoverInfo, HoverMachine, HoverState, HoverTracker, LeaveBehavior, PointerEvent,
    PointerEventKind, PointerEvents,
};
pub use layout::{HeadlessMeasurer, LayoutFixture, StaticLayout};
pub use tree::{DocumentTree, HtmlTree, ReadableBlock};

/// Version of readably
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `html` and describe its readable blocks in document order.
pub fn classify_html(html: &str, classifier: &Classifier) -> Vec<ReadableBlock> {
    let tree = HtmlTree::parse(html);
    classifier
        .classify(&tree, tree.body())
        .into_iter()
        .map(|node| tree.describe(node))
        .collect()
}
