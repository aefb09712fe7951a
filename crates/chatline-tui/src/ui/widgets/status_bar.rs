//! Status bar widget.

use crate::text::{truncate_to_width, visual_width};
use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

/// A key hint for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    mode_style: Style,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar showing `mode` on the left.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            mode_style: Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
            hints: Vec::new(),
            right_text: None,
        }
    }

    /// Highlight the mode indicator as a warning (e.g. while busy).
    #[must_use]
    pub fn warn(mut self, warn: bool) -> Self {
        if warn {
            self.mode_style = Styles::default().bg(Palette::WARNING).fg(Palette::BG);
        }
        self
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(format!(" {} ", self.mode), self.mode_style),
            Span::styled(" ", Styles::status_bar()),
        ];

        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(
                format!(" {} ", hint.label),
                Styles::key_label(),
            ));
        }

        let left_line = Line::from(spans);
        let left_width = left_line.width();
        buf.set_line(area.x, area.y, &left_line, area.width);

        // Right text only when it does not collide with the hints.
        if let Some(text) = self.right_text {
            let room = (area.width as usize).saturating_sub(left_width + 2);
            if room > 3 {
                let text = truncate_to_width(text, room);
                let x = area.x + area.width - visual_width(&text) as u16 - 1;
                buf.set_string(x, area.y, text, Styles::status_bar());
            }
        }
    }
}
