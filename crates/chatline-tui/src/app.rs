//! Application state and update logic for the chatline TUI.

use crate::event::Action;
use crate::transcript::{content_height, Transcript, TranscriptState, SCROLL_SPEED};
use crate::ui::layout::chat_layout;
use crate::ui::widgets::TextInputState;
use chatline_engine::{ConversationState, Phase, Session, SettleOutcome, SubmitOutcome, Transport};
use ratatui::layout::Rect;
use std::sync::Arc;
use tracing::{debug, trace};

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Input line state.
    pub input: TextInputState,

    /// Transcript scroll state.
    pub transcript: TranscriptState,

    /// Animation tick counter (spinner).
    pub tick: usize,

    /// The conversation and its outstanding request.
    session: Session,

    /// Chat endpoint, shown in the status bar.
    endpoint: String,
}

impl App {
    /// Create an app talking to `transport`.
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            input: TextInputState::new(),
            transcript: TranscriptState::new(),
            tick: 0,
            session: Session::new(transport),
            endpoint: endpoint.into(),
        }
    }

    /// Current conversation snapshot.
    pub fn conversation(&self) -> &ConversationState {
        self.session.state()
    }

    /// Current controller phase.
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Whether a reply is outstanding.
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Chat endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.transcript.tick();
    }

    /// Reconcile the transcript scroll with the latest snapshot for a frame
    /// of the given size.
    pub fn sync_view(&mut self, area: Rect) {
        let (transcript_area, _, _) = chat_layout(area);
        let viewport = Transcript::viewport(transcript_area);
        let conversation = self.session.state();
        let rows = content_height(conversation, viewport.width as usize);
        self.transcript
            .sync(conversation.revision(), rows, viewport.height as usize);
    }

    /// Apply the outstanding reply if it has arrived.
    pub async fn poll_session(&mut self) -> Option<SettleOutcome> {
        let outcome = self.session.poll_settled().await;
        if let Some(outcome) = outcome {
            debug!(?outcome, "reply applied");
        }
        outcome
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::Back | Action::Insert('?') => self.show_help = false,
                _ => {}
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => self.submit_input(),
            Action::Insert('?') if self.input.is_empty() => self.show_help = true,
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => {
                if self.input.is_empty() {
                    self.transcript.jump_to_end();
                } else {
                    self.input.move_end();
                }
            }
            Action::Up => {
                let recall = self.input.is_browsing_history()
                    || (self.input.is_empty() && self.input.has_history());
                if recall {
                    self.input.history_prev();
                } else {
                    self.transcript.scroll_up(1);
                }
            }
            Action::Down => {
                if self.input.is_browsing_history() {
                    self.input.history_next();
                } else {
                    self.transcript.scroll_down(1);
                }
            }
            Action::PageUp => self.transcript.page_up(),
            Action::PageDown => self.transcript.page_down(),
            Action::ScrollUp => self.transcript.scroll_up(SCROLL_SPEED),
            Action::ScrollDown => self.transcript.scroll_down(SCROLL_SPEED),
            Action::Back | Action::None => {}
        }
    }

    /// Insert pasted text into the input.
    pub fn paste(&mut self, text: &str) {
        if !self.show_help {
            self.input.insert_str(text);
        }
    }

    /// Submit the input line.
    ///
    /// While a reply is outstanding submitting is unavailable and the draft
    /// stays in the input. Otherwise the input is cleared, even when the
    /// text was blank and therefore ignored.
    pub fn submit_input(&mut self) {
        if self.session.is_busy() {
            trace!("submit unavailable while waiting for a reply");
            return;
        }

        let text = self.input.submit();
        match self.session.submit(&text) {
            SubmitOutcome::Dispatched(dispatch) => {
                debug!(request = %dispatch.request, "input submitted");
                self.transcript.jump_to_end();
            }
            SubmitOutcome::Ignored(reason) => {
                trace!(?reason, "input ignored");
            }
        }
    }

    /// Wait for the outstanding reply and apply it.
    #[cfg(test)]
    pub async fn wait_settled(&mut self) -> Option<SettleOutcome> {
        self.session.wait_settled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_idle_app, create_test_app, ScriptedTransport};
    use chatline_engine::{ChatTurn, Role, TransportError, FAILURE_MESSAGE, GREETING};
    use pretty_assertions::assert_eq;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    fn turns(app: &App) -> Vec<(Role, String)> {
        app.conversation()
            .turns()
            .iter()
            .map(|t| (t.role(), t.content().to_string()))
            .collect()
    }

    #[test]
    fn test_initial_state_is_greeting() {
        let app = create_idle_app();
        assert_eq!(
            turns(&app),
            vec![(Role::Assistant, GREETING.to_string())]
        );
        assert!(!app.is_busy());
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_submit_then_reply() {
        let transport = ScriptedTransport::new(vec![Ok("Hi there!".into())]);
        let mut app = create_test_app(transport.clone());

        type_text(&mut app, "Hello");
        app.handle_action(Action::Submit);

        assert!(app.is_busy());
        assert!(app.input.is_empty());
        assert_eq!(app.conversation().last_turn(), Some(&ChatTurn::user("Hello")));

        transport.release();
        assert_eq!(app.wait_settled().await, Some(SettleOutcome::Replied));
        assert!(!app.is_busy());
        assert_eq!(
            app.conversation().last_turn(),
            Some(&ChatTurn::assistant("Hi there!"))
        );
        assert_eq!(transport.calls(), vec!["Hello"]);
    }

    #[tokio::test]
    async fn test_failed_reply_shows_failure_turn() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::EmptyReply)]);
        let mut app = create_test_app(transport.clone());

        type_text(&mut app, "Hello");
        app.handle_action(Action::Submit);
        transport.release();

        assert_eq!(app.wait_settled().await, Some(SettleOutcome::Failed));
        assert!(!app.is_busy());
        let last = app.conversation().last_turn().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), FAILURE_MESSAGE);
    }

    #[test]
    fn test_blank_submit_clears_input_only() {
        let mut app = create_idle_app();
        let revision = app.conversation().revision();

        type_text(&mut app, "   ");
        app.handle_action(Action::Submit);

        assert!(app.input.is_empty());
        assert!(!app.is_busy());
        assert_eq!(app.conversation().revision(), revision);
        assert_eq!(app.conversation().turns().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_while_busy_keeps_draft() {
        let transport = ScriptedTransport::new(vec![Ok("ok A".into()), Ok("ok B".into())]);
        let mut app = create_test_app(transport.clone());

        type_text(&mut app, "A");
        app.handle_action(Action::Submit);
        type_text(&mut app, "B");
        app.handle_action(Action::Submit);

        assert_eq!(app.input.content(), "B");
        assert_eq!(app.conversation().turns().len(), 2);

        transport.release();
        app.wait_settled().await;

        // Idle again: the kept draft goes through.
        app.handle_action(Action::Submit);
        transport.release();
        app.wait_settled().await;

        assert_eq!(transport.calls(), vec!["A", "B"]);
        assert_eq!(
            turns(&app),
            vec![
                (Role::Assistant, GREETING.to_string()),
                (Role::User, "A".to_string()),
                (Role::Assistant, "ok A".to_string()),
                (Role::User, "B".to_string()),
                (Role::Assistant, "ok B".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_poll_session_without_request() {
        let mut app = create_idle_app();
        assert_eq!(app.poll_session().await, None);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = create_idle_app();

        app.handle_action(Action::Insert('?'));
        assert!(app.show_help);
        assert!(app.input.is_empty());

        // Typing is swallowed while help is open.
        app.handle_action(Action::Insert('x'));
        assert!(app.input.is_empty());

        app.handle_action(Action::Back);
        assert!(!app.show_help);
    }

    #[test]
    fn test_question_mark_types_when_input_not_empty() {
        let mut app = create_idle_app();
        type_text(&mut app, "why?");
        assert_eq!(app.input.content(), "why?");
        assert!(!app.show_help);
    }

    #[test]
    fn test_message_can_start_with_question_mark() {
        let mut app = create_idle_app();
        type_text(&mut app, "why");
        app.handle_action(Action::Home);
        app.handle_action(Action::Insert('?'));
        assert_eq!(app.input.content(), "?why");
        assert!(!app.show_help);
    }

    #[test]
    fn test_quit_from_help() {
        let mut app = create_idle_app();
        app.show_help = true;
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_paste_goes_to_input() {
        let mut app = create_idle_app();
        app.paste("pasted\ntext");
        assert_eq!(app.input.content(), "pastedtext");
    }

    #[tokio::test]
    async fn test_up_recalls_history_when_input_empty() {
        let transport = ScriptedTransport::new(vec![Ok("ok".into())]);
        let mut app = create_test_app(transport.clone());

        type_text(&mut app, "first");
        app.handle_action(Action::Submit);
        transport.release();
        app.wait_settled().await;

        app.handle_action(Action::Up);
        assert_eq!(app.input.content(), "first");
        app.handle_action(Action::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_up_scrolls_without_history() {
        let mut app = create_idle_app();
        app.transcript.sync(0, 30, 10);

        app.handle_action(Action::Up);
        assert!(!app.transcript.is_following());
        assert_eq!(app.transcript.offset(), 19);

        app.handle_action(Action::End);
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_end_moves_cursor_when_typing() {
        let mut app = create_idle_app();
        type_text(&mut app, "abc");
        app.handle_action(Action::Home);
        app.handle_action(Action::End);
        assert_eq!(app.input.cursor(), 3);
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let mut app = create_idle_app();
        app.transcript.sync(0, 30, 10);
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.transcript.offset(), 20 - SCROLL_SPEED);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.transcript.offset(), 20);
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_tick_advances_spinner() {
        let mut app = create_idle_app();
        app.tick();
        app.tick();
        assert_eq!(app.tick, 2);
    }
}
