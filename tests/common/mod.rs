//! Shared helpers for the integration tests
//!
//! Each test gets its own SQLite file with the reference schema, so tests can
//! run in parallel.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use emptrack::engine::sqlite::SqliteStore;
use emptrack::{
    ConnectionConfig, Department, Employee, EmployeeStore, NewEmployee, NewRole, Result, Role,
    TableView, TrackerError,
};

const SCHEMA: &str = "
    CREATE TABLE department (
        id INTEGER PRIMARY KEY,
        name VARCHAR(30) UNIQUE NOT NULL
    );
    CREATE TABLE role (
        id INTEGER PRIMARY KEY,
        title VARCHAR(30) UNIQUE NOT NULL,
        salary DECIMAL NOT NULL,
        department_id INTEGER NOT NULL REFERENCES department(id)
    );
    CREATE TABLE employee (
        id INTEGER PRIMARY KEY,
        first_name VARCHAR(30) NOT NULL,
        last_name VARCHAR(30) NOT NULL,
        role_id INTEGER NOT NULL REFERENCES role(id),
        manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
    );
";

/// A temp-file database that is removed on drop
pub struct TestDb {
    pub path: PathBuf,
    pub store: SqliteStore,
}

impl TestDb {
    /// Fresh database with the schema and no rows
    pub fn empty() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir()
            .join(format!("emptrack_test_{}_{id}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let conn = rusqlite::Connection::open(&path).expect("Failed to create temp database");
            conn.execute_batch(SCHEMA).expect("Failed to create schema");
        }

        let store = SqliteStore::connect(&ConnectionConfig::sqlite(path.clone()))
            .expect("Failed to open temp database");
        Self { path, store }
    }

    /// Database with two departments, three roles and two employees
    ///
    /// Grace Hopper (Lead Engineer) manages Alan Turing (Software Engineer).
    pub async fn seeded() -> Self {
        let db = Self::empty();
        let s = &db.store;

        let engineering = s.add_department("Engineering").await.unwrap();
        let finance = s.add_department("Finance").await.unwrap();

        let lead = s
            .add_role(&NewRole {
                title: "Lead Engineer".to_string(),
                salary: 150000.0,
                department_id: engineering,
            })
            .await
            .unwrap();
        let engineer = s
            .add_role(&NewRole {
                title: "Software Engineer".to_string(),
                salary: 120000.0,
                department_id: engineering,
            })
            .await
            .unwrap();
        s.add_role(&NewRole {
            title: "Accountant".to_string(),
            salary: 125000.0,
            department_id: finance,
        })
        .await
        .unwrap();

        let grace = s
            .add_employee(&NewEmployee {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                role_id: lead,
                manager_id: None,
            })
            .await
            .unwrap();
        s.add_employee(&NewEmployee {
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            role_id: engineer,
            manager_id: Some(grace),
        })
        .await
        .unwrap();

        db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (departments, roles, employees) row counts
    pub async fn counts(&self) -> (usize, usize, usize) {
        (
            self.store.list_departments().await.unwrap().len(),
            self.store.list_roles().await.unwrap().len(),
            self.store.list_employees().await.unwrap().len(),
        )
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Store whose connection is gone: every call fails
pub struct UnavailableStore;

fn gone<T>() -> Result<T> {
    Err(TrackerError::connection_failed("server closed the connection unexpectedly"))
}

impl EmployeeStore for UnavailableStore {
    async fn view_departments(&self) -> Result<TableView> {
        gone()
    }

    async fn view_roles(&self) -> Result<TableView> {
        gone()
    }

    async fn view_employees(&self) -> Result<TableView> {
        gone()
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        gone()
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        gone()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        gone()
    }

    async fn add_department(&self, _name: &str) -> Result<i32> {
        gone()
    }

    async fn add_role(&self, _role: &NewRole) -> Result<i32> {
        gone()
    }

    async fn add_employee(&self, _employee: &NewEmployee) -> Result<i32> {
        gone()
    }

    async fn update_employee_role(&self, _employee_id: i32, _role_id: i32) -> Result<u64> {
        gone()
    }
}

/// Captured stdout as a string
pub fn text(out: &[u8]) -> String {
    String::from_utf8(out.to_vec()).expect("output is UTF-8")
}

pub fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
