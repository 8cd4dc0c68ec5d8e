//! Line commands read from stdin and turned into [`UiEvent`]s.

use crate::app::{App, UiEvent};
use log::{debug, warn};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

pub const HELP: &str = "commands: skip | resize W H | toggle | enter | leave | outside | \
refresh | list | read ID | read-all | open ID | delete ID | get URL | visit URL | quit";

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("unknown command {0:?}")]
    Unknown(String),

    #[error("{0} needs an argument")]
    Missing(&'static str),

    #[error("bad argument {value:?} for {command}")]
    Argument { command: &'static str, value: String },
}

fn arg<T: std::str::FromStr>(
    command: &'static str,
    value: Option<&str>,
) -> Result<T, InputError> {
    let value = value.ok_or(InputError::Missing(command))?;
    value.parse().map_err(|_| InputError::Argument {
        command,
        value: value.to_string(),
    })
}

/// Parses one command line. Blank lines give `None`.
pub fn parse(line: &str) -> Result<Option<UiEvent>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let event = match command {
        "skip" => UiEvent::Skip,
        "resize" => UiEvent::Resize {
            width: arg("resize", words.next())?,
            height: arg("resize", words.next())?,
        },
        "toggle" => UiEvent::PanelToggle,
        "enter" => UiEvent::PointerEnter,
        "leave" => UiEvent::PointerLeave,
        "outside" => UiEvent::OutsideClick,
        "refresh" => UiEvent::Refresh,
        "list" => UiEvent::List,
        "read" => UiEvent::MarkRead(arg("read", words.next())?),
        "read-all" => UiEvent::MarkAllRead,
        "open" => UiEvent::Open(arg("open", words.next())?),
        "delete" => UiEvent::Delete(arg("delete", words.next())?),
        "get" => UiEvent::Fetch(arg("get", words.next())?),
        "visit" => UiEvent::Visit(arg("visit", words.next())?),
        "quit" | "exit" => UiEvent::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(event))
}

/// Reads commands on a background thread. The channel closes at end of input.
pub fn spawn_reader<R: BufRead + Send + 'static>(reader: R) -> Receiver<UiEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Stopped reading commands: {}", e);
                    break;
                }
            };
            match parse(&line) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{}; {}", e, HELP),
            }
        }
        debug!("Command input closed");
    });
    rx
}

/// Hands every queued event to the app. Returns `false` once the input is
/// gone for good.
pub fn dispatch(app: &mut App, events: &Receiver<UiEvent>) -> bool {
    loop {
        match events.try_recv() {
            Ok(event) => app.handle_event(event),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}
