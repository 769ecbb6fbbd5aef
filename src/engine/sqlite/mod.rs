//! `SQLite` Database Engine Implementation
//!
//! This module implements the `EmployeeStore` trait for `SQLite` database files.
//! It serves single-user local setups and the integration test suite.
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - The file must already exist; schema creation is out of scope
//! - `PRAGMA foreign_keys = ON` so reference violations surface as errors,
//!   matching `PostgreSQL` behavior
//! - BLOB data is Base64-encoded for display

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::engine::{
    ConnectionConfig, DatabaseType, Department, Employee, EmployeeStore, NewEmployee, NewRole,
    Role, TableView,
};
use crate::error::{Result, TrackerError};

const VIEW_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY id";

const VIEW_ROLES: &str = "
    SELECT role.id, role.title, department.name AS department, role.salary
    FROM role
    LEFT JOIN department ON role.department_id = department.id
    ORDER BY role.id";

const VIEW_EMPLOYEES: &str = "
    SELECT e.id, e.first_name, e.last_name, r.title, d.name AS department,
           r.salary, m.first_name || ' ' || m.last_name AS manager
    FROM employee e
    LEFT JOIN role r ON e.role_id = r.id
    LEFT JOIN department d ON r.department_id = d.id
    LEFT JOIN employee m ON e.manager_id = m.id
    ORDER BY e.id";

/// `SQLite` store holding the single open connection
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database file named by `config`
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::SQLite {
            return Err(TrackerError::invalid_input(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| TrackerError::invalid_input("SQLite requires 'file' parameter"))?;

        let conn = Connection::open_with_flags(file_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|e| {
                TrackerError::connection_failed(format!("Failed to open SQLite database: {e}"))
            })?;

        conn.pragma_update(None, "foreign_keys", "ON").map_err(|e| {
            TrackerError::connection_failed(format!("Failed to enable foreign keys: {e}"))
        })?;

        info!(db = %config.describe(), "connected");
        Ok(Self { conn })
    }

    fn query_view(&self, sql: &str) -> Result<TableView> {
        debug!(sql, "query");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| TrackerError::query_failed(format!("Failed to prepare query: {e}")))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| row_to_json(width, row))
            .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TrackerError::query_failed(format!("Failed to fetch row: {e}")))?;

        Ok(TableView { columns, rows })
    }

    fn query_list<T>(
        &self,
        sql: &str,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        debug!(sql, "query");
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| TrackerError::query_failed(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], map)
            .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TrackerError::query_failed(format!("Failed to fetch row: {e}")))?;

        Ok(rows)
    }
}

impl EmployeeStore for SqliteStore {
    async fn view_departments(&self) -> Result<TableView> {
        self.query_view(VIEW_DEPARTMENTS)
    }

    async fn view_roles(&self) -> Result<TableView> {
        self.query_view(VIEW_ROLES)
    }

    async fn view_employees(&self) -> Result<TableView> {
        self.query_view(VIEW_EMPLOYEES)
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.query_list("SELECT id, name FROM department ORDER BY id", |row| {
            Ok(Department { id: row.get("id")?, name: row.get("name")? })
        })
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.query_list(
            "SELECT id, title, salary, department_id FROM role ORDER BY id",
            |row| {
                Ok(Role {
                    id: row.get("id")?,
                    title: row.get("title")?,
                    salary: row.get("salary")?,
                    department_id: row.get("department_id")?,
                })
            },
        )
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.query_list(
            "SELECT id, first_name, last_name, role_id, manager_id FROM employee ORDER BY id",
            |row| {
                Ok(Employee {
                    id: row.get("id")?,
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    role_id: row.get("role_id")?,
                    manager_id: row.get("manager_id")?,
                })
            },
        )
    }

    async fn add_department(&self, name: &str) -> Result<i32> {
        let sql = "INSERT INTO department (name) VALUES (?1) RETURNING id";
        debug!(sql, "insert");
        self.conn
            .query_row(sql, params![name], |row| row.get(0))
            .map_err(|e| TrackerError::query_failed(format!("Failed to add department: {e}")))
    }

    async fn add_role(&self, role: &NewRole) -> Result<i32> {
        let sql = "INSERT INTO role (title, salary, department_id) VALUES (?1, ?2, ?3) RETURNING id";
        debug!(sql, "insert");
        self.conn
            .query_row(sql, params![role.title, role.salary, role.department_id], |row| row.get(0))
            .map_err(|e| TrackerError::query_failed(format!("Failed to add role: {e}")))
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<i32> {
        let sql = "INSERT INTO employee (first_name, last_name, role_id, manager_id) \
                   VALUES (?1, ?2, ?3, ?4) RETURNING id";
        debug!(sql, "insert");
        self.conn
            .query_row(
                sql,
                params![
                    employee.first_name,
                    employee.last_name,
                    employee.role_id,
                    employee.manager_id
                ],
                |row| row.get(0),
            )
            .map_err(|e| TrackerError::query_failed(format!("Failed to add employee: {e}")))
    }

    async fn update_employee_role(&self, employee_id: i32, role_id: i32) -> Result<u64> {
        let sql = "UPDATE employee SET role_id = ?1 WHERE id = ?2";
        debug!(sql, "update");
        let changed = self.conn.execute(sql, params![role_id, employee_id]).map_err(|e| {
            TrackerError::query_failed(format!("Failed to update employee role: {e}"))
        })?;
        Ok(changed as u64)
    }
}

/// Convert a `SQLite` row to display values
fn row_to_json(width: usize, row: &Row<'_>) -> rusqlite::Result<Vec<serde_json::Value>> {
    (0..width).map(|idx| sqlite_value_to_json(row, idx)).collect()
}

/// Convert a `SQLite` value to a JSON value
fn sqlite_value_to_json(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    use rusqlite::types::ValueRef;

    let value_ref = row.get_ref(idx)?;

    Ok(match value_ref {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            use base64::Engine;
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    })
}
