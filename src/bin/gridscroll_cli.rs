//! CLI tool for gridscroll - lays out a grid description and outputs JSON
//!
//! Usage:
//!   gridscroll_cli <grid.json>              # Output JSON to stdout
//!   gridscroll_cli <grid.json> -o out.json  # Output JSON to file
//!   gridscroll_cli <grid.json> -v           # Debug logging on stderr
//!
//! Input is a grid configuration (`columns`, `scroll`, `emptyText`) plus
//! optional `rows`, `rowHeight`, `viewport`, `measuredWidths` and a list of
//! `scrollTo` requests replayed against in-memory panes.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use gridscroll::layout::DEFAULT_ROW_HEIGHT;
use gridscroll::{
    BodyContent, GridConfig, GridScroll, LayoutResult, ManualScheduler, MeasuredRows, MemoryPane,
    PaneStyles, ScrollPosition, ScrollRequest, ScrollResolution, ViewportMetrics,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliInput {
    #[serde(flatten)]
    config: GridConfig,
    #[serde(default)]
    rows: Vec<String>,
    row_height: Option<f64>,
    viewport: Option<ViewportMetrics>,
    #[serde(default)]
    measured_widths: BTreeMap<String, f64>,
    #[serde(default)]
    scroll_to: Vec<ScrollRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOutput {
    layout: LayoutResult,
    styles: PaneStyles,
    body: BodyContent,
    header_gutter: f64,
    scroll_to: Vec<ScrollResolution>,
    position: ScrollPosition,
}

fn run(input: CliInput) -> gridscroll::Result<CliOutput> {
    input.config.validate()?;
    let scheduler = ManualScheduler::new();
    let (grid, handle) = GridScroll::mount(input.config, Box::new(scheduler.clone()))?;

    for (id, _) in grid.arrangement().panes() {
        grid.register_pane(id, MemoryPane::new());
    }
    if !input.rows.is_empty() {
        let height = input.row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
        grid.set_rows(MeasuredRows::uniform(input.rows, height));
    }
    for (key, width) in &input.measured_widths {
        grid.report_column_width(key, *width);
    }
    if let Some(viewport) = input.viewport {
        grid.observe_viewport(viewport.client_width, viewport.client_height);
        grid.observe_content(viewport.scroll_width, viewport.scroll_height);
    }
    grid.run_frame();

    let mut resolutions = Vec::with_capacity(input.scroll_to.len());
    for request in &input.scroll_to {
        resolutions.push(handle.scroll_to(request));
        if scheduler.take_pending() {
            grid.run_frame();
        }
    }

    Ok(CliOutput {
        layout: grid.layout(),
        styles: grid.styles(),
        body: grid.body(),
        header_gutter: grid.header_gutter(),
        scroll_to: resolutions,
        position: grid.position(),
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridscroll_cli <grid.json> [-o output.json] [-v]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));
    let level = if args.iter().any(|a| a == "-v") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let input = match load_input(input_path) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error loading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let output = match run(input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_output(&output, output_path.map(String::as_str)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Read and parse a grid description.
fn load_input(path: &str) -> gridscroll::Result<CliInput> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write the result as pretty JSON to `path`, or to stdout.
fn write_output(output: &CliOutput, path: Option<&str>) -> gridscroll::Result<()> {
    let json = serde_json::to_string_pretty(output)?;
    match path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscroll::GridError;

    #[test]
    fn test_missing_input_is_io_error() {
        let result = load_input("/nonexistent/gridscroll/grid.json");
        assert!(matches!(result, Err(GridError::Io(_))));
    }

    #[test]
    fn test_run_replays_scroll_requests() {
        let input: CliInput = serde_json::from_str(
            r#"{
                "columns": [{"key": "a", "width": 100, "fixed": "left"}, {"key": "b"}],
                "scroll": {"y": 200},
                "rows": ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"],
                "viewport": {"clientWidth": 400, "clientHeight": 200, "scrollWidth": 400, "scrollHeight": 400},
                "scrollTo": [{"key": "r3"}, {"key": "missing"}]
            }"#,
        )
        .unwrap();
        let output = run(input).unwrap();
        assert_eq!(
            output.scroll_to[0],
            ScrollResolution::Applied(ScrollPosition::new(0.0, 120.0))
        );
        assert_eq!(output.scroll_to[1], ScrollResolution::Unresolved);
        assert!((output.position.top - 120.0).abs() < f64::EPSILON);
    }
}
