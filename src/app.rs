//! Main Menu Loop
//!
//! `AwaitingChoice → Dispatching → handler → AwaitingChoice`, until the user
//! picks Quit or cancels the menu.

use std::io::Write;

use tracing::{info, warn};

use crate::engine::EmployeeStore;
use crate::error::{Result, TrackerError};
use crate::handlers::{self, Flow};
use crate::menu::{MenuChoice, MENU_PROMPT};
use crate::prompt::Prompter;

/// What to do when a handler fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Stop the loop and return the error
    #[default]
    Exit,
    /// Report the error on stderr and show the menu again
    Continue,
}

impl OnError {
    #[must_use]
    pub const fn from_keep_going(keep_going: bool) -> Self {
        if keep_going {
            Self::Continue
        } else {
            Self::Exit
        }
    }
}

/// Run the menu until Quit
///
/// Terminal errors always end the loop, even under [`OnError::Continue`],
/// since the menu could not be shown again anyway.
pub async fn run<S, P, W>(store: &S, prompter: &mut P, out: &mut W, on_error: OnError) -> Result<()>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    let labels = MenuChoice::labels();

    loop {
        let choice = match prompter.select(MENU_PROMPT, &labels)? {
            Some(idx) => MenuChoice::from_index(idx).ok_or_else(|| {
                TrackerError::terminal_failed(format!("Menu returned out-of-range entry {idx}"))
            })?,
            None => MenuChoice::Quit,
        };

        match handlers::dispatch(choice, store, prompter, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                info!("quit");
                return Ok(());
            }
            Err(err @ TrackerError::TerminalFailed(_)) => return Err(err),
            Err(err) if on_error == OnError::Continue => {
                warn!(code = err.error_code(), action = %choice, "handler failed: {err}");
                // stdout carries only tables and confirmations
                eprintln!("Error: {err}");
            }
            Err(err) => return Err(err),
        }
        out.flush()?;
    }
}
