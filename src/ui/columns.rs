// Fixed-width row rendering for streamed tables

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Renders rows of string cells into fixed-width columns
///
/// A width of `0` passes the cell through untouched. Cells that already carry
/// terminal styling are also passed through, since their byte content no
/// longer matches what the terminal shows.
#[derive(Debug, Clone)]
pub struct ColumnFormatter {
    widths: Vec<usize>,
    separator: String,
}

impl ColumnFormatter {
    pub fn new(widths: Vec<usize>, separator: impl Into<String>) -> Self {
        Self {
            widths,
            separator: separator.into(),
        }
    }

    /// Formatter that never pads or truncates
    pub fn pass_through(columns: usize, separator: impl Into<String>) -> Self {
        Self::new(vec![0; columns], separator)
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Format one row. Cells beyond the number of widths (or widths beyond
    /// the number of cells) are dropped.
    pub fn format<S: AsRef<str>>(&self, values: &[S]) -> String {
        let cells: Vec<String> = values
            .iter()
            .zip(self.widths.iter())
            .map(|(value, &width)| fit_cell(value.as_ref(), width))
            .collect();

        cells.join(&self.separator).trim_end().to_string()
    }
}

/// True when the text contains ANSI escape sequences
pub fn is_styled(value: &str) -> bool {
    value.contains('\u{1b}')
}

fn fit_cell(value: &str, width: usize) -> String {
    if width == 0 || is_styled(value) {
        return value.to_string();
    }

    let value_width = value.width();
    if value_width <= width {
        return format!("{}{}", value, " ".repeat(width - value_width));
    }

    // Too narrow for an ellipsis: hard cut
    if width <= ELLIPSIS.len() {
        let cut = take_columns(value, width);
        let pad = width.saturating_sub(cut.width());
        return format!("{}{}", cut, " ".repeat(pad));
    }

    let mut out = take_columns(value, width - ELLIPSIS.len());
    let pad = (width - ELLIPSIS.len()).saturating_sub(out.width());
    out.push_str(&" ".repeat(pad));
    out.push_str(ELLIPSIS);
    out
}

/// Longest prefix of `value` that fits in `columns` terminal columns
fn take_columns(value: &str, columns: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in value.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > columns {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out
}
