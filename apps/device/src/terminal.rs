use std::io::{self, IsTerminal, Stdout, Write};

use client_core::{DisplayDriver, DriverError};

/// Character display drawn as a boxed frame on a terminal.
///
/// Every mutation redraws the whole frame; the surface is a few short rows.
pub struct TerminalDisplay<W: Write = Stdout> {
    out: W,
    width: usize,
    rows: Vec<String>,
    presence: bool,
    ansi: bool,
}

impl TerminalDisplay<Stdout> {
    pub fn stdout(width: usize) -> Self {
        let ansi = io::stdout().is_terminal();
        Self::new(io::stdout(), width, ansi)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, width: usize, ansi: bool) -> Self {
        Self {
            out,
            width,
            rows: Vec::new(),
            presence: false,
            ansi,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) -> Result<(), DriverError> {
        let mut frame = String::new();
        if self.ansi {
            frame.push_str("\x1b[2J\x1b[H");
        }
        let marker = if self.presence { " <3 " } else { "" };
        let rule = "-".repeat(self.width.saturating_sub(marker.chars().count()));
        frame.push_str(&format!("+{rule}{marker}+\n"));
        for row in &self.rows {
            let pad = self.width.saturating_sub(row.chars().count());
            frame.push_str(&format!("|{row}{}|\n", " ".repeat(pad)));
        }
        frame.push_str(&format!("+{}+\n", "-".repeat(self.width)));
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> DisplayDriver for TerminalDisplay<W> {
    fn clear(&mut self) -> Result<(), DriverError> {
        self.rows.clear();
        self.redraw()
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), DriverError> {
        if self.rows.len() <= row {
            self.rows.resize(row + 1, String::new());
        }
        self.rows[row] = text.chars().take(self.width).collect();
        self.redraw()
    }

    fn set_presence(&mut self, on: bool) -> Result<(), DriverError> {
        if self.presence != on {
            self.presence = on;
            self.redraw()?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriverError> {
        self.rows.clear();
        self.presence = false;
        self.redraw()
    }
}
