//! The INIT → LOGIN → READY phase machine.
//!
//! Transitions are pure functions producing the lines to print; the driver
//! loop owns the current [`Phase`] and does the terminal and network I/O.
//! Only two conditions end the process with a failure status, a rejected
//! LOGON and an unreachable service, and both travel up to `main` as a
//! [`RunError`] instead of exiting from here.

use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use thiserror::Error;
use tracing::debug;

use wopr_client::{ClientError, GameTransport};
use wopr_core::session::SessionStore;

use crate::dispatch::{self, Dispatch};
use crate::helpers;
use crate::login::LoginGate;

/// Prompt shown while authenticating.
const LOGON_PROMPT: &str = "LOGON: ";
/// Prompt shown in the ready loop.
const READY_PROMPT: &str = "$ ";
/// Printed on any graceful shutdown (quit, Ctrl-C, Ctrl-D).
const GOODBYE: &str = "Exiting WOPR. Goodbye!";

/// Stage of the interaction. The driver owns the current value; no phase
/// outside these three is representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    Login,
    Ready,
}

/// Conditions that end the process with a failure status. Everything else
/// is absorbed inside the ready loop or becomes a graceful shutdown.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("identification not recognized")]
    LoginRejected,
    #[error(transparent)]
    Transport(#[from] ClientError),
}

/// Banner printed on entry to INIT.
pub fn init_lines() -> Vec<String> {
    vec![
        "WOPR".to_string(),
        "Loading...".to_string(),
        String::new(),
        String::new(),
    ]
}

/// Outcome of feeding one line to the login gate.
#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    /// Credential accepted; lines are the success banner.
    Granted(Vec<String>),
    /// Credential refused; lines are the rejection banner. Terminal, no
    /// second attempt.
    Refused(Vec<String>),
}

/// Decide what a LOGON line does. Pure; printing and the phase change stay
/// with the driver.
pub fn login_transition(input: &str, gate: &dyn LoginGate) -> LoginOutcome {
    if gate.authorize(input.trim()) {
        LoginOutcome::Granted(vec![
            "LOGON SUCCESSFUL".to_string(),
            String::new(),
            "GREETINGS, PROFESSOR FALKEN.".to_string(),
            "CAN YOU EXPLAIN THE REMOVAL OF YOUR USER ACCOUNT".to_string(),
            "ON JUNE 23, 1973?".to_string(),
        ])
    } else {
        LoginOutcome::Refused(vec![
            "IDENTIFICATION NOT RECOGNIZED BY SYSTEM".to_string(),
            "--CONNECTION TERMINATED--".to_string(),
        ])
    }
}

/// What a blocking prompt read produced.
enum ReadOutcome {
    Line(String),
    /// Ctrl-C, Ctrl-D, or an unusable terminal; all become a graceful exit.
    Abort,
}

/// Whether the phase loop keeps going.
#[derive(PartialEq)]
enum Step {
    Continue,
    Quit,
}

/// Driver for the phase loop. Owns the terminal editor, the session store,
/// and the transport.
pub struct Wopr {
    phase: Phase,
    store: SessionStore,
    transport: Box<dyn GameTransport>,
    gate: Box<dyn LoginGate>,
    editor: Editor<(), DefaultHistory>,
}

impl Wopr {
    /// Build the driver with a fresh editor and loaded input history.
    pub fn new(
        store: SessionStore,
        transport: Box<dyn GameTransport>,
        gate: Box<dyn LoginGate>,
    ) -> anyhow::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        editor.set_max_history_size(1000)?;

        let history_path = helpers::history_path();
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
            debug!("loaded input history from {}", history_path.display());
        }

        Ok(Wopr {
            phase: Phase::Init,
            store,
            transport,
            gate,
            editor,
        })
    }

    /// Run phases until the user leaves or a fatal condition surfaces.
    ///
    /// `Ok(())` is a graceful shutdown (quit, interrupt, end-of-input);
    /// `Err` maps to a failure exit status in `main`.
    pub async fn run(&mut self) -> Result<(), RunError> {
        let result = self.phase_loop().await;
        helpers::save_history(&mut self.editor);
        result
    }

    async fn phase_loop(&mut self) -> Result<(), RunError> {
        loop {
            let step = match self.phase {
                Phase::Init => self.init_phase(),
                Phase::Login => self.login_phase()?,
                Phase::Ready => self.ready_phase().await?,
            };
            if step == Step::Quit {
                return Ok(());
            }
        }
    }

    /// INIT: wipe the stored identifier, show the banner, move to LOGIN.
    fn init_phase(&mut self) -> Step {
        self.store.clear();
        println!("{}", init_lines().join("\n"));
        self.phase = Phase::Login;
        println!("{}", "Phase: INIT -> LOGIN".green().bold());
        Step::Continue
    }

    /// LOGIN: one attempt. A mismatch terminates the run.
    fn login_phase(&mut self) -> Result<Step, RunError> {
        let input = match self.read_line(LOGON_PROMPT) {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Abort => {
                self.say_goodbye();
                return Ok(Step::Quit);
            }
        };

        match login_transition(&input, self.gate.as_ref()) {
            LoginOutcome::Granted(lines) => {
                println!("{}", lines.join("\n"));
                self.phase = Phase::Ready;
                println!("\n{}", "Phase: LOGIN -> READY".green().bold());
                Ok(Step::Continue)
            }
            LoginOutcome::Refused(lines) => {
                println!();
                for line in &lines {
                    println!("{}", line.red());
                }
                Err(RunError::LoginRejected)
            }
        }
    }

    /// READY: read one line, dispatch, print, stay.
    async fn ready_phase(&mut self) -> Result<Step, RunError> {
        let input = match self.read_line(READY_PROMPT) {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Abort => {
                self.say_goodbye();
                return Ok(Step::Quit);
            }
        };

        let trimmed = input.trim();
        if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(&input);
        }

        match dispatch::dispatch(trimmed, self.transport.as_ref(), &self.store).await {
            Ok(Dispatch::Exit) => {
                println!("{}", GOODBYE.yellow().bold());
                Ok(Step::Quit)
            }
            Ok(Dispatch::Output(lines)) => {
                for line in &lines {
                    helpers::print_line(line);
                }
                Ok(Step::Continue)
            }
            Err(e) => {
                println!("{}", e.to_string().red());
                Err(RunError::Transport(e))
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.editor.readline(prompt) {
            Ok(line) => ReadOutcome::Line(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => ReadOutcome::Abort,
            Err(e) => {
                eprintln!("Input error: {e}");
                ReadOutcome::Abort
            }
        }
    }

    fn say_goodbye(&self) {
        println!("\n{}", GOODBYE.yellow().bold());
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
