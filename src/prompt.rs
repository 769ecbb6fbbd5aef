//! Interactive Prompts
//!
//! Handlers never talk to the terminal directly; they ask a [`Prompter`].
//! [`TerminalPrompter`] renders prompts with `dialoguer`. [`ScriptedPrompter`]
//! replays canned answers and records every list it was shown, which lets the
//! menu loop run unattended.

use std::collections::VecDeque;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::error::{Result, TrackerError};

/// Source of user answers
pub trait Prompter {
    /// Pick one of `items`; `None` when the user cancels (Esc or `q`)
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Free text; the terminal implementation re-asks on empty input
    fn text(&mut self, prompt: &str) -> Result<String>;

    /// A number; the terminal implementation re-asks until the input parses
    fn number(&mut self, prompt: &str) -> Result<f64>;
}

/// `dialoguer`-backed prompter for real terminals
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?)
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme).with_prompt(prompt).interact_text()?)
    }

    fn number(&mut self, prompt: &str) -> Result<f64> {
        Ok(Input::<f64>::with_theme(&self.theme).with_prompt(prompt).interact_text()?)
    }
}

/// One canned answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Select the item with this exact label
    Pick(String),
    /// Cancel the selection
    Cancel,
    Text(String),
    Number(f64),
}

impl Answer {
    pub fn pick(label: impl Into<String>) -> Self {
        Self::Pick(label.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// A selection list as it was presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub prompt: String,
    pub items: Vec<String>,
}

/// Prompter that replays a fixed script
///
/// Asking for an answer of the wrong kind, picking a label that is not on
/// offer, or running past the end of the script is a `TerminalFailed` error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    shown: Vec<Shown>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self { answers: answers.into_iter().collect(), shown: Vec::new() }
    }

    /// Every selection list presented so far, in order
    #[must_use]
    pub fn shown(&self) -> &[Shown] {
        &self.shown
    }

    /// Answers not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.answers.pop_front().ok_or_else(|| {
            TrackerError::terminal_failed(format!("No scripted answer left for '{prompt}'"))
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.shown.push(Shown { prompt: prompt.to_string(), items: items.to_vec() });
        match self.next(prompt)? {
            Answer::Cancel => Ok(None),
            Answer::Pick(label) => items.iter().position(|item| *item == label).map(Some).ok_or_else(
                || TrackerError::terminal_failed(format!("'{label}' is not offered by '{prompt}'")),
            ),
            other => Err(TrackerError::terminal_failed(format!(
                "Expected a selection for '{prompt}', script has {other:?}"
            ))),
        }
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(value) => Ok(value),
            other => Err(TrackerError::terminal_failed(format!(
                "Expected text for '{prompt}', script has {other:?}"
            ))),
        }
    }

    fn number(&mut self, prompt: &str) -> Result<f64> {
        match self.next(prompt)? {
            Answer::Number(value) => Ok(value),
            other => Err(TrackerError::terminal_failed(format!(
                "Expected a number for '{prompt}', script has {other:?}"
            ))),
        }
    }
}
