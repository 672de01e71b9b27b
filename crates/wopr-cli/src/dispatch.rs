//! Ready-loop command dispatch — local commands vs. remote forwarding.
//!
//! Local commands (`exit`/`quit`, `echo `) never touch the transport.
//! Everything else goes to the service with the stored conversation
//! identifier, and any identifier the service returns is persisted before
//! the reply is printed.

use tracing::{debug, warn};

use wopr_client::{ClientError, GameTransport};
use wopr_core::session::SessionStore;
use wopr_core::types::WoprResponse;

/// Inputs that end the program (case-insensitive).
const EXIT_COMMANDS: &[&str] = &["exit", "quit"];
/// Prefix of the local echo command. The bare word `echo` is not a command;
/// it is forwarded like any other message.
const ECHO_PREFIX: &str = "echo ";

/// How one line of output should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Normal,
    /// Service-error detail, rendered distinguishably (red).
    Error,
}

/// One line to print, tagged with how to render it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub kind: LineKind,
}

impl OutputLine {
    pub fn normal(text: impl Into<String>) -> Self {
        OutputLine {
            text: text.into(),
            kind: LineKind::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        OutputLine {
            text: text.into(),
            kind: LineKind::Error,
        }
    }
}

/// Result of dispatching one trimmed input line.
#[derive(Debug, PartialEq)]
pub enum Dispatch {
    /// The user asked to leave; the caller shuts down with a success status.
    Exit,
    /// Lines to print, in order.
    Output(Vec<OutputLine>),
}

/// Classify `input` and produce its output.
///
/// An empty line is forwarded verbatim as an empty message: whatever is
/// typed is what the service sees.
pub async fn dispatch(
    input: &str,
    transport: &dyn GameTransport,
    store: &SessionStore,
) -> Result<Dispatch, ClientError> {
    if is_exit_command(input) {
        return Ok(Dispatch::Exit);
    }

    if let Some(payload) = echo_payload(input) {
        return Ok(Dispatch::Output(vec![OutputLine::normal(payload)]));
    }

    forward(input, transport, store).await
}

/// `exit` / `quit`, any case.
fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.iter().any(|cmd| input.eq_ignore_ascii_case(cmd))
}

/// The text after `echo `, if `input` is the echo command.
///
/// Case-insensitive on the prefix only; the payload comes back untouched.
fn echo_payload(input: &str) -> Option<&str> {
    let prefix = input.get(..ECHO_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(ECHO_PREFIX) {
        Some(&input[ECHO_PREFIX.len()..])
    } else {
        None
    }
}

/// Forward `input` to the service and turn the outcome into output lines.
async fn forward(
    input: &str,
    transport: &dyn GameTransport,
    store: &SessionStore,
) -> Result<Dispatch, ClientError> {
    let session_id = match store.load() {
        Ok(id) => id,
        Err(e) => {
            warn!("ignoring unreadable session file: {e}");
            None
        }
    };

    match transport.send(input, session_id.as_deref()).await? {
        WoprResponse::Reply(reply) => {
            if let Some(id) = &reply.session_id {
                if let Err(e) = store.save(id) {
                    warn!("failed to persist session identifier: {e}");
                }
            }
            debug!(lines = reply.message.split('\n').count(), "printing reply");
            let lines = reply.message.split('\n').map(OutputLine::normal).collect();
            Ok(Dispatch::Output(lines))
        }
        WoprResponse::ServiceError { detail } => {
            Ok(Dispatch::Output(vec![OutputLine::error(detail)]))
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use wopr_core::session::SESSION_FILE;

    /// Transport double that records calls and replays a scripted outcome.
    struct ScriptedTransport {
        calls: Mutex<Vec<(String, Option<String>)>>,
        response: WoprResponse,
    }

    impl ScriptedTransport {
        fn new(response: WoprResponse) -> Self {
            ScriptedTransport {
                calls: Mutex::new(Vec::new()),
                response,
            }
        }

        fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GameTransport for ScriptedTransport {
        async fn send(
            &self,
            message: &str,
            session_id: Option<&str>,
        ) -> Result<WoprResponse, ClientError> {
            self.calls
                .lock()
                .unwrap()
                .push((message.to_string(), session_id.map(String::from)));
            Ok(self.response.clone())
        }
    }

    fn temp_store() -> (SessionStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path().join(SESSION_FILE)));
        (store, dir)
    }

    #[tokio::test]
    async fn exit_and_quit_any_case() {
        let transport = ScriptedTransport::new(WoprResponse::reply("unused", None));
        let (store, _dir) = temp_store();

        for input in ["exit", "EXIT", "quit", "Quit"] {
            let result = dispatch(input, &transport, &store).await.unwrap();
            assert_eq!(result, Dispatch::Exit);
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn echo_returns_payload_without_transport() {
        let transport = ScriptedTransport::new(WoprResponse::reply("unused", None));
        let (store, _dir) = temp_store();
        store.save("abc123").unwrap();

        let result = dispatch("echo hello world", &transport, &store)
            .await
            .unwrap();

        assert_eq!(
            result,
            Dispatch::Output(vec![OutputLine::normal("hello world")])
        );
        assert!(transport.calls().is_empty());
        // Stored identifier untouched.
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn echo_prefix_is_case_insensitive_payload_is_not() {
        let transport = ScriptedTransport::new(WoprResponse::reply("unused", None));
        let (store, _dir) = temp_store();

        let result = dispatch("ECHO Hello World", &transport, &store).await.unwrap();
        assert_eq!(
            result,
            Dispatch::Output(vec![OutputLine::normal("Hello World")])
        );
    }

    #[tokio::test]
    async fn bare_echo_is_forwarded() {
        let transport = ScriptedTransport::new(WoprResponse::reply("ok", None));
        let (store, _dir) = temp_store();

        let result = dispatch("echo", &transport, &store).await.unwrap();

        assert_eq!(result, Dispatch::Output(vec![OutputLine::normal("ok")]));
        assert_eq!(transport.calls(), vec![("echo".to_string(), None)]);
    }

    #[tokio::test]
    async fn forward_uses_stored_identifier() {
        let transport = ScriptedTransport::new(WoprResponse::reply("ok", None));
        let (store, _dir) = temp_store();
        store.save("abc123").unwrap();

        dispatch("hi", &transport, &store).await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![("hi".to_string(), Some("abc123".to_string()))]
        );
    }

    #[tokio::test]
    async fn reply_identifier_is_persisted() {
        let transport = ScriptedTransport::new(WoprResponse::reply(
            "line1\nline2",
            Some("abc123".to_string()),
        ));
        let (store, _dir) = temp_store();

        let result = dispatch("hi", &transport, &store).await.unwrap();

        assert_eq!(
            result,
            Dispatch::Output(vec![
                OutputLine::normal("line1"),
                OutputLine::normal("line2"),
            ])
        );
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn reply_without_identifier_keeps_stored_one() {
        let transport = ScriptedTransport::new(WoprResponse::reply("ok", None));
        let (store, _dir) = temp_store();
        store.save("old-id").unwrap();

        dispatch("hi", &transport, &store).await.unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("old-id"));
    }

    #[tokio::test]
    async fn service_error_is_one_error_line() {
        let transport = ScriptedTransport::new(WoprResponse::service_error("quota exceeded"));
        let (store, _dir) = temp_store();

        let result = dispatch("hi", &transport, &store).await.unwrap();

        assert_eq!(
            result,
            Dispatch::Output(vec![OutputLine::error("quota exceeded")])
        );
        // No identifier appears out of a refusal.
        assert!(store.load().unwrap().is_none());
    }

    // Preserved literal behavior: a blank line is sent as an empty message,
    // not swallowed locally.
    #[tokio::test]
    async fn blank_line_is_forwarded() {
        let transport = ScriptedTransport::new(WoprResponse::reply("ok", None));
        let (store, _dir) = temp_store();

        dispatch("", &transport, &store).await.unwrap();

        assert_eq!(transport.calls(), vec![("".to_string(), None)]);
    }

    #[tokio::test]
    async fn unreadable_session_file_treated_as_absent() {
        let transport = ScriptedTransport::new(WoprResponse::reply("ok", None));
        let (store, _dir) = temp_store();
        std::fs::write(store.path(), "not json {{{").unwrap();

        dispatch("hi", &transport, &store).await.unwrap();

        assert_eq!(transport.calls(), vec![("hi".to_string(), None)]);
    }
}
