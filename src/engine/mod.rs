//! Database Engine Traits and Core Types
//!
//! This module defines the data model of the employees schema and the
//! `EmployeeStore` trait that each engine implements.
//!
//! # Connection Lifecycle
//! A store owns exactly one connection, opened by `connect` at startup and
//! released when the store is dropped. Handlers borrow the store; nothing is
//! cached between calls.
//!
//! # Engine Isolation
//! Each engine implementation is completely independent and carries its own SQL.
//! No shared SQL helpers or cross-engine abstractions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[default]
    Postgres,
    /// `SQLite` database file
    #[value(name = "sqlite")]
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (`file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    ///
    /// `password` is `None` for trust or peer authentication.
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password,
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }

    /// Short description of the target, safe for logs (no password)
    #[must_use]
    pub fn describe(&self) -> String {
        match self.engine {
            DatabaseType::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user.as_deref().unwrap_or("?"),
                self.host.as_deref().unwrap_or("?"),
                self.port.map_or_else(|| "?".to_string(), |p| p.to_string()),
                self.database.as_deref().unwrap_or("?"),
            ),
            DatabaseType::SQLite => format!(
                "sqlite://{}",
                self.file.as_ref().map_or_else(|| "?".into(), |f| f.display().to_string())
            ),
        }
    }
}

/// A row of the `department` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

/// A row of the `role` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub title: String,
    pub salary: f64,
    pub department_id: i32,
}

/// A row of the `employee` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub manager_id: Option<i32>,
}

impl Employee {
    /// "First Last", as shown in selection lists and confirmations
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Values for a new role
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    pub title: String,
    pub salary: f64,
    pub department_id: i32,
}

/// Values for a new employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub manager_id: Option<i32>,
}

/// Result set of a view query, ready for table rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Column names in result set
    pub columns: Vec<String>,

    /// Result rows (each row is a vec of values matching column order)
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Data access for the employees schema
///
/// Every method issues exactly one statement with values bound as parameters.
pub trait EmployeeStore {
    /// All departments
    fn view_departments(&self) -> impl std::future::Future<Output = Result<TableView>>;

    /// All roles, with the department name instead of its id
    fn view_roles(&self) -> impl std::future::Future<Output = Result<TableView>>;

    /// All employees, with role title, department, salary and manager name
    fn view_employees(&self) -> impl std::future::Future<Output = Result<TableView>>;

    /// Departments in id order, for selection lists
    fn list_departments(&self) -> impl std::future::Future<Output = Result<Vec<Department>>>;

    /// Roles in id order, for selection lists
    fn list_roles(&self) -> impl std::future::Future<Output = Result<Vec<Role>>>;

    /// Employees in id order, for selection lists
    fn list_employees(&self) -> impl std::future::Future<Output = Result<Vec<Employee>>>;

    /// Insert a department and return its new id
    fn add_department(&self, name: &str) -> impl std::future::Future<Output = Result<i32>>;

    /// Insert a role and return its new id
    fn add_role(&self, role: &NewRole) -> impl std::future::Future<Output = Result<i32>>;

    /// Insert an employee and return its new id
    fn add_employee(&self, employee: &NewEmployee)
        -> impl std::future::Future<Output = Result<i32>>;

    /// Point an employee at a different role; returns the number of rows updated
    fn update_employee_role(
        &self,
        employee_id: i32,
        role_id: i32,
    ) -> impl std::future::Future<Output = Result<u64>>;
}
