//! The visual side of the progress bar: a bar with a width and a text label.

use std::fmt;

/// Width of the bar element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarWidth {
    /// Absolute width; only `Pixels(0)` is used, to collapse the bar before submission.
    Pixels(u32),
    /// Relative width in `0..=100`.
    Percent(u8),
}

impl BarWidth {
    pub const COLLAPSED: BarWidth = BarWidth::Pixels(0);
    pub const FULL: BarWidth = BarWidth::Percent(100);

    /// Fraction of the container covered, in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        match *self {
            BarWidth::Pixels(_) => 0.0,
            BarWidth::Percent(p) => f64::from(p.min(100)) / 100.0,
        }
    }
}

impl fmt::Display for BarWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarWidth::Pixels(px) => write!(f, "{}px", px),
            BarWidth::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Container the progress bar renders into.
///
/// The container is handed to [`crate::poller::UploadProgressBar::attach`]
/// explicitly and then owned by the poll task.
pub trait ProgressView: Send + 'static {
    /// Create the bar and label inside the container. Called once, from `attach`.
    fn mount(&mut self) {}

    /// Make the (initially hidden) container visible.
    fn reveal(&mut self);

    fn set_bar_width(&mut self, width: BarWidth);

    fn set_label(&mut self, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_renders_css_units() {
        assert_eq!(BarWidth::COLLAPSED.to_string(), "0px");
        assert_eq!(BarWidth::Percent(10).to_string(), "10%");
        assert_eq!(BarWidth::FULL.to_string(), "100%");
    }

    #[test]
    fn bar_width_fraction() {
        assert_eq!(BarWidth::COLLAPSED.fraction(), 0.0);
        assert_eq!(BarWidth::Percent(25).fraction(), 0.25);
        assert_eq!(BarWidth::FULL.fraction(), 1.0);
    }
}
