//! Two-state status label shown in the status slot
use std::fmt;

const PRODUCT: &str = "EasyTier";

/// Content of the status display slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    /// Shown until the first poll finishes
    Collecting,
    Running,
    NotRunning,
}

impl StatusLabel {
    pub fn from_running(running: bool) -> Self {
        if running {
            StatusLabel::Running
        } else {
            StatusLabel::NotRunning
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            StatusLabel::Collecting => "Collecting data…",
            StatusLabel::Running => "RUNNING",
            StatusLabel::NotRunning => "NOT RUNNING",
        }
    }

    /// Colour of the label; green is the affirmative treatment
    pub fn color(&self) -> Option<&'static str> {
        match self {
            StatusLabel::Collecting => None,
            StatusLabel::Running => Some("green"),
            StatusLabel::NotRunning => Some("red"),
        }
    }

    /// HTML fragment for the web panel's status paragraph
    pub fn to_html(&self) -> String {
        match self.color() {
            Some(color) => format!(
                "<em><span style=\"color:{}\"><strong>{} {}</strong></span></em>",
                color,
                PRODUCT,
                self.text()
            ),
            None => self.text().to_string(),
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::Collecting => f.write_str(self.text()),
            _ => write!(f, "{} {}", PRODUCT, self.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_states() {
        assert_eq!(StatusLabel::Running.to_string(), "EasyTier RUNNING");
        assert_eq!(StatusLabel::NotRunning.to_string(), "EasyTier NOT RUNNING");
        assert_eq!(
            StatusLabel::Running.to_html(),
            "<em><span style=\"color:green\"><strong>EasyTier RUNNING</strong></span></em>"
        );
        assert!(StatusLabel::NotRunning.to_html().contains("color:red"));
        assert_eq!(StatusLabel::Collecting.to_html(), "Collecting data…");
    }
}
