//! Chat screen: transcript, input line and status bar.

use super::Screen;
use crate::app::App;
use crate::transcript::{input_placeholder, Transcript};
use crate::ui::layout::chat_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};

/// The single chat screen.
pub struct ChatScreen;

impl ChatScreen {
    fn hints(app: &App) -> Vec<KeyHint> {
        let mut hints = Vec::new();
        if !app.is_busy() {
            hints.push(KeyHint::new("Enter", "Send"));
        }
        if app.transcript.has_more_below() {
            hints.push(KeyHint::new("End", "Newest"));
        }
        hints.push(KeyHint::new("?", "Help"));
        hints.push(KeyHint::new("Ctrl+C", "Quit"));
        hints
    }
}

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (transcript_area, input_area, status_area) = chat_layout(area);

        Transcript::new(app.conversation(), &app.transcript)
            .tick(app.tick)
            .render(transcript_area, buf);

        let busy = app.is_busy();
        let border_style = if busy {
            Styles::border()
        } else {
            Styles::border_active()
        };
        app.input
            .widget()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .style(Styles::default()),
            )
            .focused(!app.show_help)
            .disabled(busy)
            .placeholder(input_placeholder(busy))
            .render(input_area, buf);

        StatusBar::new(app.phase().display_name())
            .warn(busy)
            .hints(Self::hints(app))
            .right(app.endpoint())
            .render(status_area, buf);
    }
}
