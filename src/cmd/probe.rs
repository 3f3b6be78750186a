use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Serialize;

use readably::{
    element_bounds, is_point_inside_element, line_height_of_first_line, Bounds, Config, HeadlessMeasurer,
    HoverTracker, HtmlTree, LayoutFixture, LeaveBehavior, Point, PointerEvent, PointerEvents, ReadableBlock,
};

use crate::{ExclusionArgs, OutputFormat};

#[derive(Debug, Serialize)]
struct ProbeReport {
    point: Point,
    readable_count: usize,
    hovered: Option<HoveredReport>,
}

#[derive(Debug, Serialize)]
struct HoveredReport {
    block: ReadableBlock,
    top: f64,
    left: f64,
    height_of_first_line: f64,
    /// Probe measurement of the first line, for comparison.
    measured_first_line_height: f64,
    bounds: Bounds,
}

pub fn cmd_probe(
    input: &str,
    layout_path: &Path,
    at: Point,
    leave: LeaveBehavior,
    config: &Config,
    args: &ExclusionArgs,
    format: OutputFormat,
) -> Result<()> {
    let html = super::read_input(input)?;
    let tree = HtmlTree::parse(&html);
    let fixture = LayoutFixture::load(layout_path)
        .with_context(|| format!("failed to load layout {}", layout_path.display()))?;
    let layout = Rc::new(fixture.resolve(&tree)?);

    let classifier = super::classifier(config, args);
    let readable: Rc<[_]> = classifier.classify(&tree, tree.body()).into();
    let target = readable
        .iter()
        .copied()
        .find(|&node| is_point_inside_element(at, &*layout, node));

    let events = Rc::new(RefCell::new(PointerEvents::new()));
    let tracker = HoverTracker::new(Rc::clone(&events), Rc::clone(&layout), Rc::clone(&readable), leave);
    if let Some(node) = target {
        events.borrow_mut().dispatch(&PointerEvent::over(node));
    }

    let hovered = tracker.current().map(|info| HoveredReport {
        block: tree.describe(info.element),
        top: info.top,
        left: info.left,
        height_of_first_line: info.height_of_first_line,
        measured_first_line_height: line_height_of_first_line(&*layout, &HeadlessMeasurer, info.element),
        bounds: element_bounds(&*layout, info.element),
    });

    let report = ProbeReport {
        point: at,
        readable_count: readable.len(),
        hovered,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &ProbeReport) {
    println!(
        "🎯 Probe at ({}, {}) over {} readable blocks",
        report.point.x, report.point.y, report.readable_count
    );

    let Some(hovered) = &report.hovered else {
        println!("\nNo readable block under the pointer");
        return;
    };

    println!("\n📖 {}", hovered.block.path);
    println!("   {}", hovered.block.preview);
    println!("\n📐 Overlay:");
    println!("   Top: {:.1}px", hovered.top);
    println!("   Left: {:.1}px", hovered.left);
    println!("   First line (line-height): {:.1}px", hovered.height_of_first_line);
    println!("   First line (measured): {:.1}px", hovered.measured_first_line_height);
    println!(
        "   Bounds: {:.1}x{:.1} at ({:.1}, {:.1})",
        hovered.bounds.width, hovered.bounds.height, hovered.bounds.left, hovered.bounds.top
    );
}
