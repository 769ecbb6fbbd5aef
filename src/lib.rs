//! emptrack - Interactive Employee Tracker
//!
//! emptrack manages a small `department` / `role` / `employee` schema from the
//! terminal. A fixed menu offers seven actions; each runs one or two
//! parameterized statements and prints a table or a one-line confirmation.
//!
//! # Architecture
//! The binary resolves settings, opens one connection, and hands it by
//! reference to the menu loop. Everything below the entry point is generic over
//! two seams:
//! - [`EmployeeStore`] - data access, one implementation per database engine
//! - [`Prompter`] - user input, `dialoguer` on a terminal or a script in tests
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`config`] - Settings files, flags and environment
//! - [`engine`] - Data model, store trait and engine implementations
//! - [`prompt`] - Prompt abstraction
//! - [`menu`] - The fixed main menu
//! - [`handlers`] - One handler per menu action
//! - [`app`] - The menu loop
//! - [`output`] - Table rendering
//! - [`logging`] - Tracing subscriber setup

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod menu;
pub mod output;
pub mod prompt;

pub use app::{run, OnError};
pub use config::{resolve_settings, Settings, SettingsLayer};
pub use engine::{
    ConnectionConfig, DatabaseType, Department, Employee, EmployeeStore, NewEmployee, NewRole,
    Role, TableView,
};
pub use error::{Result, TrackerError};
pub use menu::MenuChoice;
pub use prompt::{Answer, Prompter, ScriptedPrompter, TerminalPrompter};
