use std::fmt::Write;

use crate::config::{GraphConfig, UncommittedChangesStyle};
use crate::core::Line;
use crate::layout::{EdgeGeometryResolver, Point, RowGraphData, Segment};

const NODE_RADIUS: f32 = 4.0;
const MERGE_NODE_RADIUS: f32 = 5.0;
const STROKE_WIDTH: f32 = 2.0;

/// Draws rows as SVG. Each row is drawn from its own data only, in a group
/// translated to the row's top edge.
pub struct SvgRenderer<'a> {
    config: &'a GraphConfig,
    geometry: EdgeGeometryResolver,
    expanded_row: Option<usize>,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self {
            config,
            geometry: EdgeGeometryResolver::new(config.grid.x, config.grid.offset_x),
            expanded_row: None,
        }
    }

    /// Leave `expand_y` of extra space below `row` (commit details)
    pub fn with_expanded_row(mut self, row: Option<usize>) -> Self {
        self.expanded_row = row;
        self
    }

    pub fn render(&self, rows: &[RowGraphData]) -> String {
        let columns = rows.iter().map(RowGraphData::width).max().unwrap_or(0);
        let width = match columns {
            0 => 0.0,
            n => 2.0 * self.config.grid.offset_x + (n - 1) as f32 * self.config.grid.x,
        };
        let height = (0..rows.len()).fold(0.0, |total, i| total + self.row_height(i));

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"graph\" \
             width=\"{:.2}\" height=\"{:.2}\">",
            width, height
        );
        svg.push_str(
            "<style>.uncommitted{stroke-dasharray:2,2}.merge-preview{stroke-dasharray:4,2}\
             .mute{opacity:0.4}</style>",
        );

        let mut top = 0.0;
        for (i, row) in rows.iter().enumerate() {
            let row_height = self.row_height(i);
            let class = if row.muted { "row mute" } else { "row" };
            let _ = write!(svg, "<g class=\"{}\" transform=\"translate(0,{:.2})\">", class, top);
            svg.push_str(&self.render_row(row, row_height));
            svg.push_str("</g>");
            top += row_height;
        }

        svg.push_str("</svg>");
        svg
    }

    /// One row in local coordinates: top edge at 0, node at `offset_y`
    pub fn render_row(&self, row: &RowGraphData, row_height: f32) -> String {
        let centre = self.config.grid.offset_y;
        let mut out = String::new();

        for lane in &row.passing_lanes {
            let x = self.geometry.column_x(lane.column);
            let from = Point::new(x, 0.0);
            let to = Point::new(x, row_height);
            let class = line_class(lane.is_committed, lane.is_merge_preview);
            self.write_line(&mut out, class, from, to, lane.color);
        }

        // curved arrivals are drawn by the row above
        for line in row.incoming_lines.iter().filter(|l| l.is_straight()) {
            let x = self.geometry.column_x(line.to_column);
            let from = Point::new(x, 0.0);
            let to = Point::new(x, centre);
            let class = line_class(line.is_committed, line.is_merge_preview);
            self.write_line(&mut out, class, from, to, line.color);
        }

        for line in &row.outgoing_lines {
            self.render_line(&mut out, line, centre, row_height);
        }

        out.push_str(&self.render_node(row, centre));
        out
    }

    fn render_line(&self, out: &mut String, line: &Line, y: f32, row_height: f32) {
        let class = line_class(line.is_committed, line.is_merge_preview);
        match self.geometry.resolve(line.from_column, line.to_column, y, row_height) {
            Segment::Straight { from, to } => self.write_line(out, class, from, to, line.color),
            curve => {
                let _ = write!(
                    out,
                    "<path class=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    class,
                    curve.to_path(self.config.style),
                    self.config.colour(line.color),
                    STROKE_WIDTH
                );
            }
        }
    }

    fn write_line(&self, out: &mut String, class: &str, from: Point, to: Point, color: usize) {
        let _ = write!(
            out,
            "<line class=\"{}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" \
             stroke=\"{}\" stroke-width=\"{}\"/>",
            class,
            from.x,
            from.y,
            to.x,
            to.y,
            self.config.colour(color),
            STROKE_WIDTH
        );
    }

    fn render_node(&self, row: &RowGraphData, y: f32) -> String {
        let open_at_checkout = self.config.uncommitted_changes
            == UncommittedChangesStyle::OpenCircleAtTheCheckedOutCommit;
        let hollow = !row.is_committed || (row.is_current && open_at_checkout);
        let radius = if row.is_merge { MERGE_NODE_RADIUS } else { NODE_RADIUS };
        let colour = self.config.colour(row.color);
        let mut class = String::from("node");
        if row.is_current {
            class.push_str(" current");
        }
        if row.is_merge {
            class.push_str(" merge");
        }
        format!(
            "<circle class=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.1}\" fill=\"{}\" \
             stroke=\"{}\" stroke-width=\"{}\"/>",
            class,
            self.geometry.column_x(row.column),
            y,
            radius,
            if hollow { "none" } else { colour },
            colour,
            STROKE_WIDTH
        )
    }

    fn row_height(&self, index: usize) -> f32 {
        if self.expanded_row == Some(index) {
            self.config.grid.y + self.config.grid.expand_y
        } else {
            self.config.grid.y
        }
    }
}

fn line_class(is_committed: bool, is_merge_preview: bool) -> &'static str {
    match (is_committed, is_merge_preview) {
        (_, true) => "line merge-preview",
        (false, false) => "line uncommitted",
        (true, false) => "line",
    }
}
