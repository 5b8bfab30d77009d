//! Terminal rendering of the progress bar: `[#####     ] 50%` redrawn in place.

use std::io::{self, Write};
use upwatch_core::view::{BarWidth, ProgressView};

const BAR_COLUMNS: usize = 30;

/// Draws the bar and label on one line, rewriting it with `\r` on each change.
/// Nothing is drawn until the view is revealed.
pub struct TerminalView<W> {
    out: W,
    visible: bool,
    width: BarWidth,
    label: String,
    last_len: usize,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            visible: false,
            width: BarWidth::COLLAPSED,
            label: String::new(),
            last_len: 0,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) {
        if !self.visible {
            return;
        }
        let line = render_line(self.width, &self.label);
        let len = line.chars().count();
        let pad = self.last_len.saturating_sub(len);
        let res = write!(self.out, "\r{}{}", line, " ".repeat(pad)).and_then(|_| self.out.flush());
        if let Err(e) = res {
            tracing::debug!("progress redraw failed: {}", e);
        }
        self.last_len = len;
    }
}

fn render_line(width: BarWidth, label: &str) -> String {
    let filled = ((width.fraction() * BAR_COLUMNS as f64).round() as usize).min(BAR_COLUMNS);
    format!(
        "[{}{}] {}",
        "#".repeat(filled),
        " ".repeat(BAR_COLUMNS - filled),
        label
    )
}

impl<W: Write + Send + 'static> ProgressView for TerminalView<W> {
    fn reveal(&mut self) {
        self.visible = true;
        self.redraw();
    }

    fn set_bar_width(&mut self, width: BarWidth) {
        self.width = width;
        self.redraw();
    }

    fn set_label(&mut self, text: &str) {
        self.label = text.to_string();
        self.redraw();
    }
}
