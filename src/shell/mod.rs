//! Interactive menu loop.

use std::io::BufRead;

use tracing::debug;

use crate::{
    coordinator::Coordinator,
    error::{HardenError, Result},
    printer::{print_menu, Level, StatusSink},
    registry::Registry,
    session::Session,
};

/// What a menu line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Quit,
    RunAll,
    ScanAll,
    Module(String),
    Invalid(String),
}

impl Selection {
    pub fn parse(input: &str, registry: &Registry) -> Self {
        let choice = input.trim().to_uppercase();
        match choice.as_str() {
            "Q" => Self::Quit,
            "A" => Self::RunAll,
            "S" => Self::ScanAll,
            _ => match registry.get(&choice) {
                Some(m) => Self::Module(m.id.clone()),
                None => Self::Invalid(input.trim().to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dispatch {
    All { scan_only: bool },
    One { id: String, scan_only: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    MenuLoop,
    AwaitingConfirmation,
    AwaitingMode(String),
    Dispatching(Dispatch),
    Exited,
}

pub struct Shell<'a, R> {
    coordinator: Coordinator<'a>,
    session: Session,
    input: R,
}

impl<'a, R: BufRead> Shell<'a, R> {
    pub fn new(coordinator: Coordinator<'a>, session: Session, input: R) -> Self {
        Self { coordinator, session, input }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Drive the menu until the operator quits or input ends.
    pub async fn run(&mut self, sink: &mut dyn StatusSink) -> Result<()> {
        let mut state = State::MenuLoop;
        loop {
            debug!(?state, "shell transition");
            state = match state {
                State::MenuLoop => self.menu(sink)?,
                State::AwaitingConfirmation => {
                    sink.prompt("Run ALL modules with FIX mode? (yes/no): ");
                    match self.read_line()? {
                        Some(answer) if answer.trim().eq_ignore_ascii_case("yes") => {
                            State::Dispatching(Dispatch::All { scan_only: false })
                        }
                        Some(_) => {
                            sink.status(Level::Error, "Cancelled.");
                            State::MenuLoop
                        }
                        None => State::Exited,
                    }
                }
                State::AwaitingMode(id) => {
                    sink.prompt("Mode - [S]can or [F]ix? (s/f): ");
                    match self.read_line()?.as_deref().map(parse_mode) {
                        Some(Some(scan_only)) => State::Dispatching(Dispatch::One { id, scan_only }),
                        Some(None) => {
                            sink.status(Level::Error, "Invalid mode, expected 's' or 'f'");
                            State::MenuLoop
                        }
                        None => State::Exited,
                    }
                }
                State::Dispatching(dispatch) => {
                    self.dispatch(dispatch, sink).await;
                    State::MenuLoop
                }
                State::Exited => {
                    sink.plain("\nExiting...");
                    return Ok(());
                }
            };
        }
    }

    fn menu(&mut self, sink: &mut dyn StatusSink) -> Result<State> {
        print_menu(sink, self.coordinator.registry());
        sink.prompt("\nSelect option: ");
        let Some(line) = self.read_line()? else {
            return Ok(State::Exited);
        };
        Ok(match Selection::parse(&line, self.coordinator.registry()) {
            Selection::Quit => State::Exited,
            Selection::RunAll => State::AwaitingConfirmation,
            Selection::ScanAll => State::Dispatching(Dispatch::All { scan_only: true }),
            Selection::Module(id) => State::AwaitingMode(id),
            Selection::Invalid(raw) => {
                sink.status(Level::Error, &HardenError::InvalidSelection(raw).to_string());
                State::MenuLoop
            }
        })
    }

    /// Errors here are reported and the menu continues.
    async fn dispatch(&mut self, dispatch: Dispatch, sink: &mut dyn StatusSink) {
        let outcome = match dispatch {
            Dispatch::All { scan_only } => self.coordinator.run_all(&mut self.session, scan_only, sink).await,
            Dispatch::One { id, scan_only } => {
                self.coordinator.run_one(&mut self.session, &id, scan_only, sink).await
            }
        };
        if let Err(e) = outcome {
            sink.status(Level::Error, &e.to_string());
        }
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(HardenError::Input)?;
        Ok((n > 0).then_some(line))
    }
}

fn parse_mode(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "s" | "scan" => Some(true),
        "f" | "fix" => Some(false),
        _ => None,
    }
}
