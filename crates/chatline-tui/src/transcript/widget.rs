//! Transcript widget.
//!
//! Renders committed turns followed, while a request is outstanding, by a
//! loading placeholder. The placeholder is drawn from the snapshot's `busy`
//! flag and never exists as a turn.

use chatline_engine::{ChatTurn, ConversationState, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::state::TranscriptState;
use crate::text::{visual_width, wrap_text};
use crate::ui::theme::{spinner_frame, Styles, Symbols};

/// Columns reserved for the assistant label.
const LABEL_WIDTH: usize = 5;

/// User bubbles take at most this share of the width (in quarters).
const USER_BUBBLE_QUARTERS: usize = 3;

/// Build the rendered rows for a conversation at the given width.
pub fn transcript_lines(
    conversation: &ConversationState,
    tick: usize,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for turn in conversation.turns().iter() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        match turn.role() {
            Role::User => push_user_turn(&mut lines, turn, width),
            Role::Assistant => push_assistant_turn(&mut lines, turn, width),
        }
    }

    if conversation.is_busy() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(loading_line(tick));
    }

    lines
}

/// Number of rows the conversation occupies at the given width.
pub fn content_height(conversation: &ConversationState, width: usize) -> usize {
    transcript_lines(conversation, 0, width).len()
}

/// Wrap `content` and pad every row to the widest one.
fn bubble_rows(content: &str, text_width: usize) -> Vec<String> {
    let rows = wrap_text(content, text_width.max(1));
    let bubble = rows.iter().map(|r| visual_width(r)).max().unwrap_or(0);
    rows.into_iter()
        .map(|row| {
            let pad = bubble.saturating_sub(visual_width(&row));
            format!(" {row}{} ", " ".repeat(pad))
        })
        .collect()
}

fn push_user_turn(lines: &mut Vec<Line<'static>>, turn: &ChatTurn, width: usize) {
    let max_bubble = (width * USER_BUBBLE_QUARTERS / 4).max(LABEL_WIDTH).min(width);
    for row in bubble_rows(turn.content(), max_bubble.saturating_sub(2)) {
        let indent = width.saturating_sub(visual_width(&row));
        lines.push(Line::from(vec![
            Span::styled(" ".repeat(indent), Styles::default()),
            Span::styled(row, Styles::user_turn()),
        ]));
    }
}

fn push_assistant_turn(lines: &mut Vec<Line<'static>>, turn: &ChatTurn, width: usize) {
    let style = if turn.is_failure() {
        Styles::failure_turn()
    } else {
        Styles::assistant_turn()
    };

    let text_width = width.saturating_sub(LABEL_WIDTH + 2);
    for (i, row) in bubble_rows(turn.content(), text_width)
        .into_iter()
        .enumerate()
    {
        let mut spans = label_spans(i == 0);
        spans.push(Span::styled(row, style));
        lines.push(Line::from(spans));
    }
}

fn label_spans(first_row: bool) -> Vec<Span<'static>> {
    if first_row {
        let label = Role::Assistant.label();
        vec![
            Span::styled(label, Styles::assistant_label()),
            Span::styled(
                " ".repeat(LABEL_WIDTH.saturating_sub(label.len())),
                Styles::default(),
            ),
        ]
    } else {
        vec![Span::styled(" ".repeat(LABEL_WIDTH), Styles::default())]
    }
}

fn loading_line(tick: usize) -> Line<'static> {
    let mut spans = label_spans(true);
    spans.push(Span::styled(
        format!(" {} {} ", spinner_frame(tick), Symbols::SKELETON),
        Styles::placeholder(),
    ));
    Line::from(spans)
}

/// Bordered, scrollable transcript pane.
pub struct Transcript<'a> {
    conversation: &'a ConversationState,
    state: &'a TranscriptState,
    tick: usize,
}

impl<'a> Transcript<'a> {
    /// Create a transcript widget.
    pub fn new(conversation: &'a ConversationState, state: &'a TranscriptState) -> Self {
        Self {
            conversation,
            state,
            tick: 0,
        }
    }

    /// Set the animation tick (drives the spinner).
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn block(&self) -> Block<'static> {
        let block = Block::default()
            .title(" chatline ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        if self.state.has_more_below() {
            block.title_bottom(Line::styled(" End: newest ", Styles::warning()).right_aligned())
        } else {
            block
        }
    }

    /// Area available for rows inside the border.
    pub fn viewport(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let rows: Vec<Line<'static>> =
            transcript_lines(self.conversation, self.tick, inner.width as usize)
                .into_iter()
                .skip(self.state.offset())
                .take(inner.height as usize)
                .collect();

        Paragraph::new(rows)
            .style(Styles::default())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use chatline_engine::{MessageStore, FAILURE_MESSAGE};
    use pretty_assertions::assert_eq;

    fn text_rows(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                text.trim_end().to_string()
            })
            .collect()
    }

    fn conversation(turns: Vec<ChatTurn>, busy: bool) -> ConversationState {
        let mut store = MessageStore::new(turns);
        store.set_busy(busy);
        store.snapshot()
    }

    #[test]
    fn test_greeting_renders_with_label() {
        let state = conversation(vec![ChatTurn::greeting()], false);
        let rows = text_rows(&transcript_lines(&state, 0, 40));
        assert_eq!(rows, vec!["bot   Hi, how can I help you today?"]);
    }

    #[test]
    fn test_user_turn_right_aligned() {
        let state = conversation(vec![ChatTurn::user("Hello")], false);
        let rows = text_rows(&transcript_lines(&state, 0, 40));
        assert_eq!(rows, vec![format!("{}Hello", " ".repeat(34))]);
    }

    #[test]
    fn test_turns_separated_by_blank_row() {
        let state = conversation(
            vec![ChatTurn::greeting(), ChatTurn::user("Hello")],
            false,
        );
        let rows = text_rows(&transcript_lines(&state, 0, 40));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "");
    }

    #[test]
    fn test_placeholder_only_while_busy() {
        let turns = vec![ChatTurn::greeting(), ChatTurn::user("Hello")];

        let busy = conversation(turns.clone(), true);
        let rows = text_rows(&transcript_lines(&busy, 0, 40));
        assert_eq!(rows.last().map(String::as_str), Some("bot   | ░░░░░░░░"));
        assert_eq!(busy.turns().len(), 2);

        let idle = conversation(turns, false);
        let rows = text_rows(&transcript_lines(&idle, 0, 40));
        assert!(!rows.iter().any(|r| r.contains(Symbols::SKELETON)));
    }

    #[test]
    fn test_placeholder_spinner_advances() {
        let state = conversation(vec![ChatTurn::greeting()], true);
        let first = text_rows(&transcript_lines(&state, 0, 40));
        let second = text_rows(&transcript_lines(&state, 1, 40));
        assert_ne!(first.last(), second.last());
    }

    #[test]
    fn test_long_assistant_turn_wraps_under_label() {
        let state = conversation(
            vec![ChatTurn::assistant("one two three four five six seven")],
            false,
        );
        let rows = text_rows(&transcript_lines(&state, 0, 20));
        assert!(rows.len() > 1);
        assert!(rows[0].starts_with("bot"));
        for row in &rows[1..] {
            assert!(row.starts_with("      "));
        }
    }

    #[test]
    fn test_failed_exchange_rows() {
        let state = conversation(
            vec![
                ChatTurn::greeting(),
                ChatTurn::user("Hello"),
                ChatTurn::failure(),
            ],
            false,
        );
        let rows = text_rows(&transcript_lines(&state, 0, 40));
        insta::assert_snapshot!(rows.join("\n"), @r"
        bot   Hi, how can I help you today?

                                          Hello

        bot   ❌ Failed to send message
        ");
    }

    #[test]
    fn test_failure_turn_uses_error_style() {
        let state = conversation(vec![ChatTurn::failure()], false);
        let lines = transcript_lines(&state, 0, 40);
        let bubble = lines[0].spans.last().unwrap();
        assert_eq!(bubble.style, Styles::failure_turn());
        assert!(bubble.content.contains(FAILURE_MESSAGE));
    }

    #[test]
    fn test_content_height_counts_placeholder() {
        let idle = conversation(vec![ChatTurn::greeting()], false);
        let busy = conversation(vec![ChatTurn::greeting()], true);
        assert_eq!(content_height(&idle, 40), 1);
        assert_eq!(content_height(&busy, 40), 3);
    }

    #[test]
    fn test_render_scrolled_window() {
        let turns = (0..6)
            .map(|i| ChatTurn::assistant(format!("reply {i}")))
            .collect();
        let state = conversation(turns, false);
        let area = Rect::new(0, 0, 30, 5);

        let mut scroll = TranscriptState::new();
        let viewport = Transcript::viewport(area);
        scroll.sync(
            state.revision(),
            content_height(&state, viewport.width as usize),
            viewport.height as usize,
        );

        let mut buf = Buffer::empty(area);
        Transcript::new(&state, &scroll).render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains("reply 5"));
        assert!(!screen.contains("reply 0"));
        assert!(screen.contains("chatline"));
    }

    #[test]
    fn test_render_shows_hint_when_scrolled_up() {
        let turns = (0..6)
            .map(|i| ChatTurn::assistant(format!("reply {i}")))
            .collect();
        let state = conversation(turns, false);
        let area = Rect::new(0, 0, 30, 5);

        let mut scroll = TranscriptState::new();
        scroll.sync(state.revision(), content_height(&state, 28), 3);
        scroll.scroll_up(10);

        let mut buf = Buffer::empty(area);
        Transcript::new(&state, &scroll).render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains("reply 0"));
        assert!(screen.contains("End: newest"));
    }
}
