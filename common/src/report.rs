use std::path::Path;

use plotly::{
    ImageFormat, Layout, Plot, Scatter,
    common::{Anchor, DashType, Font, Line, Marker, MarkerSymbol, Mode, Title},
    layout::{Axis, Legend},
};
use thiserror::Error;
use tracing::debug;

use crate::table::BenchTable;

/// 6x4 inch figure at 100 dpi.
pub const WIDTH: usize = 600;
pub const HEIGHT: usize = 400;

const LINE_WIDTH: f64 = 1.5;
const MARKER_SIZE: usize = 6;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Chart not written to {0}")]
    Write(String),
}

/// Builds the comparison chart: both strategies in black, solid/circles for
/// direct upsert and dashed/squares for staging + COPY, sharing `row_count`
/// on the x axis.
pub fn build_chart(table: &BenchTable) -> Plot {
    let rows: Vec<u64> = table.records.iter().map(|r| r.row_count).collect();
    let direct: Vec<f64> = table.records.iter().map(|r| r.direct_upsert_ms).collect();
    let staging: Vec<f64> = table.records.iter().map(|r| r.staging_copy_ms).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(rows.clone(), direct)
            .name("Direct Upsert")
            .mode(Mode::LinesMarkers)
            .line(Line::new().color("black").width(LINE_WIDTH).dash(DashType::Solid))
            .marker(Marker::new().symbol(MarkerSymbol::Circle).size(MARKER_SIZE)),
    );
    plot.add_trace(
        Scatter::new(rows, staging)
            .name("Staging + COPY")
            .mode(Mode::LinesMarkers)
            .line(Line::new().color("black").width(LINE_WIDTH).dash(DashType::Dash))
            .marker(Marker::new().symbol(MarkerSymbol::Square).size(MARKER_SIZE)),
    );
    plot.set_layout(layout());
    plot
}

/// Renders the chart to a PNG at `out`, overwriting any existing file.
pub fn render(table: &BenchTable, out: &Path) -> Result<(), ReportError> {
    let plot = build_chart(table);
    plot.write_image(out, ImageFormat::PNG, WIDTH, HEIGHT, 1.0);

    // kaleido reports export failures out of band, so confirm the file landed
    let written = std::fs::metadata(out).map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(ReportError::Write(out.display().to_string()));
    }
    debug!("Wrote {} ({written} bytes)", out.display());
    Ok(())
}

fn layout() -> Layout {
    Layout::new()
        .title(
            Title::with_text("Benchmark: Direct Upsert vs Staging COPY Upsert")
                .font(Font::new().size(10).color("black")),
        )
        .width(WIDTH)
        .height(HEIGHT)
        .x_axis(styled_axis("Number of Rows"))
        .y_axis(styled_axis("Time per Operation (ms)"))
        .show_legend(true)
        .legend(
            Legend::new()
                .x(0.01)
                .x_anchor(Anchor::Left)
                .y(0.99)
                .y_anchor(Anchor::Top)
                .border_width(0)
                .font(Font::new().size(8).color("black")),
        )
        .paper_background_color("white")
        .plot_background_color("white")
}

fn styled_axis(label: &str) -> Axis {
    Axis::new()
        .title(Title::with_text(label).font(Font::new().size(8).color("black")))
        .tick_font(Font::new().size(8).color("black"))
        .show_line(true)
        .line_color("black")
        .line_width(1)
        .mirror(true)
        .show_grid(true)
        .grid_color("grey")
        .grid_width(1)
        .zero_line(false)
}
