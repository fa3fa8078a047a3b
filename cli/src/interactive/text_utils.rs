//! Text processing utilities for interactive mode
//!
//! Unicode-aware width calculation and truncation used when laying out the
//! fund list, so CJK names and symbols do not overflow a terminal row.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Truncate `text` to at most `max_width` display columns, ending with an
/// ellipsis when anything was cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - char_width(ELLIPSIS);
    let mut truncated = String::new();
    let mut width = 0;

    for ch in text.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > budget {
            break;
        }
        truncated.push(ch);
        width += ch_width;
    }

    truncated.push(ELLIPSIS);
    truncated
}

/// Get terminal width with fallback
pub fn get_terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) => std::cmp::max(cols as usize, 20), // Minimum 20 chars
        Err(_) => 80,
    }
}

/// Get terminal height with fallback
pub fn get_terminal_height() -> u16 {
    match crossterm::terminal::size() {
        Ok((_, rows)) => std::cmp::max(rows, 4), // Prompt, status, one item, hint
        Err(_) => 24,
    }
}

/// Calculate the display width of text considering Unicode characters
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Calculate the display width of a single character
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}
