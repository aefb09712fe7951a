//! Test utilities for chatline-tui rendering and integration tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use async_trait::async_trait;
use chatline_engine::{Transport, TransportError};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Endpoint shown in the status bar of test apps.
pub const TEST_ENDPOINT: &str = "http://chat.test/chat/message";

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Transport that answers from a script and records what it was sent.
///
/// Each call waits for [`ScriptedTransport::release`] before answering.
/// Once the script runs out every call fails.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    calls: Mutex<Vec<String>>,
    gate: Notify,
}

impl ScriptedTransport {
    /// Transport answering with `replies` in order.
    pub fn new(replies: Vec<Result<String, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    /// Let one outstanding call answer.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Messages sent so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(message.to_string());
        self.gate.notified().await;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::EmptyReply))
    }
}

/// Create a test app backed by a scripted transport.
pub fn create_test_app(transport: Arc<ScriptedTransport>) -> App {
    App::new(transport, TEST_ENDPOINT)
}

/// Create a test app whose transport never answers.
pub fn create_idle_app() -> App {
    create_test_app(ScriptedTransport::new(Vec::new()))
}

/// Render a screen to a string at the default size.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &mut App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen to a string with custom dimensions.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &mut App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    app.sync_view(area);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert!(result.starts_with("Hello\nWorld"));
    }

    #[tokio::test]
    async fn test_scripted_transport_answers_in_order() {
        let transport = ScriptedTransport::new(vec![Ok("one".into())]);
        transport.release();
        assert_eq!(transport.send("a").await.unwrap(), "one");
        transport.release();
        assert!(transport.send("b").await.is_err());
        assert_eq!(transport.calls(), vec!["a", "b"]);
    }
}
