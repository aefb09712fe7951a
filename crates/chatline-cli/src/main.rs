//! chatline CLI: terminal chat client

use chatline_engine::{
    engine_version, Config, ConfigError, HttpTransport, Session, SettleOutcome, Transport,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Terminal chat client for a single HTTP chat endpoint
#[derive(Parser)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chat service base URL (overrides CHATLINE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Print the whole transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration and versions
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// TUI log file name, created in the temp dir.
const LOG_FILE: &str = "chatline.log";

fn main() {
    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        None | Some(Commands::Tui) => {
            // The alternate screen owns stderr; log to a file instead.
            let log_path = init_file_logging();
            let config = config_or_exit(api_url);
            info!(endpoint = %config.endpoint(), log = ?log_path, "starting tui");

            let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&config));
            let rt = runtime();
            if let Err(e) = rt.block_on(chatline_tui::run_tui(transport, &config.endpoint())) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Send { message, json }) => {
            init_stderr_logging();
            let config = config_or_exit(api_url);
            cmd_send(&config, &message, json);
        }
        Some(Commands::Doctor { json }) => {
            init_stderr_logging();
            cmd_doctor(api_url, json);
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().expect("Failed to create tokio runtime")
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .init();
}

/// Log to the temp dir. Returns the log path, or `None` when the file
/// cannot be opened (logging is then disabled).
fn init_file_logging() -> Option<PathBuf> {
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Some(path)
}

fn resolve_config(api_url: Option<&str>) -> Result<Config, ConfigError> {
    match api_url {
        Some(url) => Config::with_base_url(url),
        None => Config::from_env(),
    }
}

fn config_or_exit(api_url: Option<&str>) -> Config {
    match resolve_config(api_url) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_send(config: &Config, message: &str, json: bool) {
    let rt = runtime();
    match rt.block_on(run_send(config, message, json)) {
        Ok((output, code)) => {
            println!("{output}");
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Send one message and render the result.
///
/// Returns the text to print and the exit code: 0 for a real reply, 1 when
/// the failure turn was recorded. A blank message is an error.
async fn run_send(config: &Config, message: &str, json: bool) -> Result<(String, i32), String> {
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(config));
    let mut session = Session::new(transport);

    let outcome = if session.submit(message).is_dispatched() {
        session.wait_settled().await
    } else {
        None
    };
    let state = session.state();
    debug!(?outcome, turns = state.turns().len(), "send finished");

    let Some(outcome) = outcome else {
        return Err("message is empty".to_string());
    };

    let output = if json {
        serde_json::to_string_pretty(state.turns()).expect("failed to serialize")
    } else {
        state
            .last_turn()
            .map(|turn| turn.content().to_string())
            .unwrap_or_default()
    };
    let code = i32::from(outcome != SettleOutcome::Replied);
    Ok((output, code))
}

fn cmd_doctor(api_url: Option<&str>, json: bool) {
    let config = resolve_config(api_url);

    if json {
        let report = match &config {
            Ok(config) => serde_json::json!({
                "engine_version": engine_version(),
                "tui_version": chatline_tui::tui_version(),
                "config": config,
                "endpoint": config.endpoint(),
            }),
            Err(e) => serde_json::json!({
                "engine_version": engine_version(),
                "tui_version": chatline_tui::tui_version(),
                "error": e.to_string(),
            }),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("failed to serialize")
        );
    } else {
        println!("chatline diagnostics\n");
        println!("  Engine:    {}", engine_version());
        println!("  TUI:       {}", chatline_tui::tui_version());
        match &config {
            Ok(config) => {
                println!("  Base URL:  {}", config.base_url());
                println!("  Endpoint:  {}", config.endpoint());
            }
            Err(e) => println!("  Config:    {e}"),
        }
    }

    if config.is_err() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_engine::{FAILURE_MESSAGE, GREETING};
    use clap::CommandFactory;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["chatline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_send_with_global_api_url() {
        let cli = Cli::try_parse_from([
            "chatline",
            "send",
            "Hello there",
            "--json",
            "--api-url",
            "http://localhost:8080",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
        match cli.command {
            Some(Commands::Send { message, json }) => {
                assert_eq!(message, "Hello there");
                assert!(json);
            }
            _ => panic!("expected send command"),
        }
    }

    #[test]
    fn test_send_requires_message() {
        assert!(Cli::try_parse_from(["chatline", "send"]).is_err());
    }

    #[test]
    fn test_flag_overrides_environment() {
        let config = resolve_config(Some("https://chat.example.com/")).unwrap();
        assert_eq!(config.base_url(), "https://chat.example.com");
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        assert!(resolve_config(Some("not a url")).is_err());
    }

    async fn chat_server(response: ResponseTemplate) -> (MockServer, Config) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/message"))
            .respond_with(response)
            .mount(&server)
            .await;
        let config = Config::with_base_url(&server.uri()).unwrap();
        (server, config)
    }

    #[tokio::test]
    async fn test_send_prints_reply() {
        let (_server, config) =
            chat_server(ResponseTemplate::new(200).set_body_json(json!({ "result": "Hi there!" })))
                .await;

        let (output, code) = run_send(&config, "Hello", false).await.unwrap();
        assert_eq!(output, "Hi there!");
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_send_failure_exits_nonzero() {
        let (_server, config) = chat_server(ResponseTemplate::new(500)).await;

        let (output, code) = run_send(&config, "Hello", false).await.unwrap();
        assert_eq!(output, FAILURE_MESSAGE);
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_send_blank_message_is_error() {
        let (server, config) = chat_server(ResponseTemplate::new(200)).await;

        let err = run_send(&config, "   ", false).await.unwrap_err();
        assert_eq!(err, "message is empty");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_json_transcript() {
        let (_server, config) =
            chat_server(ResponseTemplate::new(200).set_body_json(json!({ "result": "Hi there!" })))
                .await;

        let (output, code) = run_send(&config, "  Hello  ", true).await.unwrap();
        assert_eq!(code, 0);

        let turns: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            turns,
            json!([
                { "role": "assistant", "content": GREETING },
                { "role": "user", "content": "Hello" },
                { "role": "assistant", "content": "Hi there!" },
            ])
        );
    }
}
