//! Word wrapping and paging for a fixed-width character surface.

use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinesPerPage {
    Fixed(NonZeroUsize),
    /// The whole message on one page.
    Unbounded,
}

const TWO_LINES: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1);

impl Default for LinesPerPage {
    fn default() -> Self {
        Self::Fixed(TWO_LINES)
    }
}

impl LinesPerPage {
    fn window(self, total_lines: usize) -> usize {
        match self {
            Self::Fixed(n) => n.get(),
            Self::Unbounded => total_lines.max(1),
        }
    }
}

/// Greedy word wrap. Words longer than `line_width` stay whole on their own
/// line; widths are counted in chars.
pub fn segment(text: &str, line_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let separator = usize::from(current_len > 0);
        if current_len > 0 && current_len + separator + word_len > line_width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Centers `text` on a `width`-char row, truncating anything past the edge.
pub fn fit_line(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let pad = width - len;
    let left = pad / 2;
    let mut out = String::with_capacity(len + pad);
    out.extend(std::iter::repeat(' ').take(left));
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(pad - left));
    out
}

/// The wrapped lines of one message plus a circular page cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pages {
    lines: Vec<String>,
    lines_per_page: LinesPerPage,
    page_index: usize,
}

impl Pages {
    pub fn new(lines: Vec<String>, lines_per_page: LinesPerPage) -> Self {
        Self {
            lines,
            lines_per_page,
            page_index: 0,
        }
    }

    pub fn from_text(text: &str, line_width: usize, lines_per_page: LinesPerPage) -> Self {
        Self::new(segment(text, line_width), lines_per_page)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn page_count(&self) -> usize {
        let window = self.lines_per_page.window(self.lines.len());
        self.lines.len().div_ceil(window)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Lines on the current page; empty when there is nothing to show.
    pub fn current(&self) -> &[String] {
        let window = self.lines_per_page.window(self.lines.len());
        let start = (self.page_index * window).min(self.lines.len());
        let end = (start + window).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn advance(&mut self) {
        let count = self.page_count();
        self.page_index = if count == 0 {
            0
        } else {
            (self.page_index + 1) % count
        };
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }
}
