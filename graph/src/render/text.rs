use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::Commit;
use crate::decor::RefDecorator;
use crate::layout::RowGraphData;

/// Box drawing characters for graph rendering
pub mod chars {
    pub const COMMIT: char = '●';
    pub const COMMIT_EMPTY: char = '○';
    pub const MERGE: char = '◉';
    pub const ELLIPSIS: char = '…';
}

// Connection directions of a connector cell
const UP: u8 = 1;
const DOWN: u8 = 2;
const LEFT: u8 = 4;
const RIGHT: u8 = 8;

fn glyph(mask: u8) -> char {
    match mask {
        0 => ' ',
        m if m == LEFT | RIGHT => '─',
        m if m == UP | RIGHT => '╰',
        m if m == UP | LEFT => '╯',
        m if m == DOWN | RIGHT => '╭',
        m if m == DOWN | LEFT => '╮',
        m if m == UP | DOWN | RIGHT => '├',
        m if m == UP | DOWN | LEFT => '┤',
        m if m == UP | LEFT | RIGHT => '┴',
        m if m == DOWN | LEFT | RIGHT => '┬',
        m if m == UP | DOWN | LEFT | RIGHT => '┼',
        m if m & (LEFT | RIGHT) != 0 => '─',
        _ => '│',
    }
}

/// ANSI palette for lane colours
const ANSI: [&str; 8] = [
    "\x1b[34m", "\x1b[35m", "\x1b[32m", "\x1b[33m", "\x1b[36m", "\x1b[31m", "\x1b[94m", "\x1b[95m",
];
const RESET: &str = "\x1b[0m";

/// Terminal rendering of laid out rows, two cells per lane
pub struct TextRenderer {
    max_message_width: usize,
    ansi: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            max_message_width: 72,
            ansi: false,
        }
    }
}

impl TextRenderer {
    pub fn new(max_message_width: usize) -> Self {
        Self {
            max_message_width,
            ..Default::default()
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Render `rows` next to the commits they were laid out from
    pub fn render(&self, commits: &[Commit], rows: &[RowGraphData], head: Option<&str>) -> String {
        let columns = rows.iter().map(RowGraphData::width).max().unwrap_or(1);
        let decorator = RefDecorator::new(head);
        let mut out = String::new();

        for (commit, row) in commits.iter().zip(rows) {
            out.push_str(&self.node_line(row, columns));

            let decoration = decorator.decorate(commit, row);
            if !decoration.is_empty() {
                let labels = format!("({}) ", decoration.labels().join(", "));
                out.push_str(&self.paint(&labels, decoration.color_index));
            }
            out.push_str(&truncate(&commit.message, self.max_message_width));
            out.push('\n');

            if row.outgoing_lines.iter().any(|line| !line.is_straight()) {
                out.push_str(connector_line(row, columns).trim_end());
                out.push('\n');
            }
        }

        out
    }

    fn node_line(&self, row: &RowGraphData, columns: usize) -> String {
        let mut cells: Vec<String> = vec!["  ".to_string(); columns];
        for lane in &row.passing_lanes {
            cells[lane.column] = format!("{} ", self.paint("│", lane.color));
        }
        let node = if !row.is_committed {
            chars::COMMIT_EMPTY
        } else if row.is_merge {
            chars::MERGE
        } else {
            chars::COMMIT
        };
        cells[row.column] = format!("{} ", self.paint(&node.to_string(), row.color));
        cells.concat()
    }

    fn paint(&self, text: &str, color: usize) -> String {
        if self.ansi {
            format!("{}{}{}", ANSI[color % ANSI.len()], text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Line drawn under a row whose node branches off or converges
fn connector_line(row: &RowGraphData, columns: usize) -> String {
    let mut masks = vec![0u8; columns * 2];

    for lane in &row.passing_lanes {
        masks[lane.column * 2] |= UP | DOWN;
    }
    for line in &row.outgoing_lines {
        let (from, to) = (line.from_column * 2, line.to_column * 2);
        if from == to {
            masks[from] |= UP | DOWN;
        } else if to > from {
            masks[from] |= UP | RIGHT;
            for mask in &mut masks[from + 1..to] {
                *mask |= LEFT | RIGHT;
            }
            masks[to] |= LEFT | DOWN;
        } else {
            masks[from] |= UP | LEFT;
            for mask in &mut masks[to + 1..from] {
                *mask |= LEFT | RIGHT;
            }
            masks[to] |= RIGHT | DOWN;
        }
    }

    masks.into_iter().map(glyph).collect()
}

/// Cut `text` to `max` display columns
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push(chars::ELLIPSIS);
    out
}
