//! Rendering of search snapshots to the terminal

use super::text_utils::{text_width, truncate_to_width};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{style, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use fundsearch_core::{FundSummary, SearchSnapshot, SearchViewState};
use std::io::{self, Write};

const PROMPT: &str = "Search funds: ";
const HINT: &str = "Up/Down move  Enter select  Esc close";

/// Screen row of the first result
pub const FIRST_ITEM_ROW: u16 = 2;

/// Slice of the result list that fits on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListWindow {
    /// Index of the first drawn result
    pub first: usize,
    /// Number of drawn results
    pub len: usize,
}

impl ListWindow {
    /// Window over `snapshot`'s results for a terminal `height` rows tall,
    /// scrolled so the highlighted result is drawn
    pub fn for_snapshot(snapshot: &SearchSnapshot, height: u16) -> Self {
        // Prompt, status line and hint take the other rows
        let max_rows = usize::from(height.saturating_sub(FIRST_ITEM_ROW + 1)).max(1);
        let count = snapshot.view.items().len();
        let first = match snapshot.selection.highlighted() {
            Some(index) if index >= max_rows => index + 1 - max_rows,
            _ => 0,
        };

        Self {
            first,
            len: count.saturating_sub(first).min(max_rows),
        }
    }

    /// Result drawn on screen `row`, if any
    pub fn item_at_row(&self, row: u16) -> Option<usize> {
        let offset = usize::from(row.checked_sub(FIRST_ITEM_ROW)?);
        (offset < self.len).then(|| self.first + offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Prompt,
    Status,
    Error,
    Item,
    Highlighted,
    Hint,
}

/// One screen row of the search view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    pub text: String,
    pub style: LineStyle,
}

impl ViewLine {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Lay out `snapshot` as rows no wider than `width`.
///
/// Row 0 is the prompt, row 1 the status line, and the results inside
/// `window` follow from [`FIRST_ITEM_ROW`] in list order.
pub fn view_lines(snapshot: &SearchSnapshot, width: usize, window: ListWindow) -> Vec<ViewLine> {
    let mut lines = vec![ViewLine::new(
        format!("{}{}", PROMPT, snapshot.query),
        LineStyle::Prompt,
    )];

    match &snapshot.view {
        SearchViewState::Idle => {
            lines.push(ViewLine::new("Type to search funds", LineStyle::Status));
        }
        SearchViewState::Searching { query } => {
            lines.push(ViewLine::new(
                format!("Searching for \"{}\"...", query),
                LineStyle::Status,
            ));
        }
        SearchViewState::Error { message, .. } => {
            lines.push(ViewLine::new(
                format!("Search failed: {}", message),
                LineStyle::Error,
            ));
        }
        SearchViewState::Results { items, .. } if items.is_empty() => {
            lines.push(ViewLine::new("No funds found", LineStyle::Status));
        }
        SearchViewState::Results { items, .. } => {
            let noun = if items.len() == 1 { "fund" } else { "funds" };
            let mut status = format!("{} {}", items.len(), noun);
            if window.len < items.len() {
                status.push_str(&format!(
                    " (showing {}-{})",
                    window.first + 1,
                    window.first + window.len
                ));
            }
            lines.push(ViewLine::new(status, LineStyle::Status));

            let shown = items
                .iter()
                .enumerate()
                .skip(window.first)
                .take(window.len);
            for (index, fund) in shown {
                let highlighted = snapshot.selection.is_highlighted(index);
                let marker = if highlighted { "> " } else { "  " };
                let style = if highlighted {
                    LineStyle::Highlighted
                } else {
                    LineStyle::Item
                };
                lines.push(ViewLine::new(
                    format!("{}{}", marker, fund_line(fund)),
                    style,
                ));
            }
        }
    }

    lines.push(ViewLine::new(HINT, LineStyle::Hint));

    for line in &mut lines {
        line.text = truncate_to_width(&line.text, width);
    }
    lines
}

/// Column of the text cursor on the prompt row
pub fn cursor_column(snapshot: &SearchSnapshot) -> u16 {
    let column = text_width(PROMPT) + text_width(&snapshot.query);
    u16::try_from(column).unwrap_or(u16::MAX)
}

fn fund_line(fund: &FundSummary) -> String {
    let mut line = fund.display_name.clone();
    if !fund.category.is_empty() {
        line.push_str(&format!("  [{}]", fund.category));
    }
    let amounts = format_amounts(fund);
    if !amounts.is_empty() {
        line.push_str(&format!("  {}", amounts));
    }
    line
}

/// Minimum investment amounts, e.g. `min SIP 500  min lumpsum 5000`
pub fn format_amounts(fund: &FundSummary) -> String {
    let amounts: Vec<String> = [
        ("min SIP", fund.min_sip_amount),
        ("min lumpsum", fund.min_lumpsum_amount),
    ]
    .into_iter()
    .filter_map(|(label, amount)| {
        amount
            .filter(|amount| *amount > 0.0)
            .map(|amount| format!("{} {}", label, format_amount(amount)))
    })
    .collect();
    amounts.join("  ")
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Redraw the whole view from the top-left corner
pub fn draw<W: Write>(out: &mut W, lines: &[ViewLine], cursor_col: u16) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    for (row, line) in lines.iter().enumerate() {
        let text = line.text.as_str();
        let styled = match line.style {
            LineStyle::Prompt => style(text).bold(),
            LineStyle::Status => style(text).dark_grey(),
            LineStyle::Error => style(text).red(),
            LineStyle::Item => style(text),
            LineStyle::Highlighted => style(text).black().on_cyan(),
            LineStyle::Hint => style(text).dark_grey().italic(),
        };
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row), PrintStyledContent(styled))?;
    }

    queue!(out, MoveTo(cursor_col, 0))?;
    out.flush()
}
