//! `PostgreSQL` Database Engine Implementation
//!
//! This module implements the `EmployeeStore` trait for `PostgreSQL` databases.
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - One `Client` per process; its connection future runs on a spawned task
//! - Every statement binds its values as `$n` parameters
//! - `salary` is read through `::float8` / `::text` casts so NUMERIC columns
//!   need no decimal crate
//! - BYTEA data is Base64-encoded for display

use tokio_postgres::{Client, Config, NoTls, Row};
use tracing::{debug, error, info};

use crate::engine::{
    ConnectionConfig, DatabaseType, Department, Employee, EmployeeStore, NewEmployee, NewRole,
    Role, TableView,
};
use crate::error::{Result, TrackerError};

const VIEW_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY id";

const VIEW_ROLES: &str = "
    SELECT role.id, role.title, department.name AS department, role.salary::text AS salary
    FROM role
    LEFT JOIN department ON role.department_id = department.id
    ORDER BY role.id";

const VIEW_EMPLOYEES: &str = "
    SELECT e.id, e.first_name, e.last_name, r.title, d.name AS department,
           r.salary::text AS salary, m.first_name || ' ' || m.last_name AS manager
    FROM employee e
    LEFT JOIN role r ON e.role_id = r.id
    LEFT JOIN department d ON r.department_id = d.id
    LEFT JOIN employee m ON e.manager_id = m.id
    ORDER BY e.id";

/// `PostgreSQL` store holding the single long-lived client
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Open the connection described by `config`
    ///
    /// The connection future is driven by a spawned task for the lifetime of the client.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::Postgres {
            return Err(TrackerError::invalid_input(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        let pg_config = build_pg_config(config)?;

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            TrackerError::connection_failed(format!("Failed to connect to PostgreSQL: {e}"))
        })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection closed: {e}");
            }
        });

        info!(db = %config.describe(), "connected");
        Ok(Self { client })
    }

    async fn query_view(&self, sql: &str) -> Result<TableView> {
        debug!(sql, "query");
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to prepare query: {e}")))?;

        let rows = self
            .client
            .query(&stmt, &[])
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))?;

        let columns: Vec<String> = stmt.columns().iter().map(|c| c.name().to_string()).collect();
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>>>()?;

        Ok(TableView { columns, rows })
    }

    async fn query_rows(&self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql, "query");
        self.client
            .query(sql, &[])
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))
    }
}

impl EmployeeStore for PostgresStore {
    async fn view_departments(&self) -> Result<TableView> {
        self.query_view(VIEW_DEPARTMENTS).await
    }

    async fn view_roles(&self) -> Result<TableView> {
        self.query_view(VIEW_ROLES).await
    }

    async fn view_employees(&self) -> Result<TableView> {
        self.query_view(VIEW_EMPLOYEES).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        let rows = self.query_rows("SELECT id, name FROM department ORDER BY id").await?;
        rows.iter().map(department_from_row).collect()
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let rows = self
            .query_rows(
                "SELECT id, title, salary::float8 AS salary, department_id FROM role ORDER BY id",
            )
            .await?;
        rows.iter().map(role_from_row).collect()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let rows = self
            .query_rows(
                "SELECT id, first_name, last_name, role_id, manager_id FROM employee ORDER BY id",
            )
            .await?;
        rows.iter().map(employee_from_row).collect()
    }

    async fn add_department(&self, name: &str) -> Result<i32> {
        let sql = "INSERT INTO department (name) VALUES ($1) RETURNING id";
        debug!(sql, "insert");
        let row = self
            .client
            .query_one(sql, &[&name])
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to add department: {e}")))?;
        get(&row, "id")
    }

    async fn add_role(&self, role: &NewRole) -> Result<i32> {
        let sql = "INSERT INTO role (title, salary, department_id) VALUES ($1, $2::float8, $3) \
                   RETURNING id";
        debug!(sql, "insert");
        let row = self
            .client
            .query_one(sql, &[&role.title, &role.salary, &role.department_id])
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to add role: {e}")))?;
        get(&row, "id")
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<i32> {
        let sql = "INSERT INTO employee (first_name, last_name, role_id, manager_id) \
                   VALUES ($1, $2, $3, $4) RETURNING id";
        debug!(sql, "insert");
        let row = self
            .client
            .query_one(
                sql,
                &[&employee.first_name, &employee.last_name, &employee.role_id, &employee.manager_id],
            )
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to add employee: {e}")))?;
        get(&row, "id")
    }

    async fn update_employee_role(&self, employee_id: i32, role_id: i32) -> Result<u64> {
        let sql = "UPDATE employee SET role_id = $1 WHERE id = $2";
        debug!(sql, "update");
        self.client.execute(sql, &[&role_id, &employee_id]).await.map_err(|e| {
            TrackerError::query_failed(format!("Failed to update employee role: {e}"))
        })
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'host' parameter"))?;

    let port = config
        .port
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'port' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config.host(host).port(port).user(user).dbname(database);

    // Trust / peer auth setups have no password
    if let Some(password) = &config.password {
        pg_config.password(password);
    }

    Ok(pg_config)
}

fn get<'a, T>(row: &'a Row, column: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column)
        .map_err(|e| TrackerError::query_failed(format!("Failed to read column '{column}': {e}")))
}

fn department_from_row(row: &Row) -> Result<Department> {
    Ok(Department { id: get(row, "id")?, name: get(row, "name")? })
}

fn role_from_row(row: &Row) -> Result<Role> {
    Ok(Role {
        id: get(row, "id")?,
        title: get(row, "title")?,
        salary: get(row, "salary")?,
        department_id: get(row, "department_id")?,
    })
}

fn employee_from_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: get(row, "id")?,
        first_name: get(row, "first_name")?,
        last_name: get(row, "last_name")?,
        role_id: get(row, "role_id")?,
        manager_id: get(row, "manager_id")?,
    })
}

/// Convert a `PostgreSQL` row to display values
fn row_to_json(row: &Row) -> Result<Vec<serde_json::Value>> {
    (0..row.len()).map(|idx| postgres_value_to_json(row, idx)).collect()
}

/// Convert a `PostgreSQL` value to a JSON value; NULL maps to `Value::Null` for every type
fn postgres_value_to_json(row: &Row, idx: usize) -> Result<serde_json::Value> {
    use serde_json::Value;
    use tokio_postgres::types::Type;

    let col_type = row.columns()[idx].type_();
    let fail = |e: tokio_postgres::Error| {
        TrackerError::query_failed(format!(
            "Failed to convert PostgreSQL type '{}': {e}",
            col_type.name()
        ))
    };

    let value = match *col_type {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).map_err(fail)?.map(Value::Bool),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx).map_err(fail)?.map(Value::from),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx).map_err(fail)?.map(Value::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx).map_err(fail)?.map(Value::from),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(fail)?
            .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
            .map(Value::Number),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .map_err(fail)?
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Type::BYTEA => {
            use base64::Engine;
            row.try_get::<_, Option<Vec<u8>>>(idx)
                .map_err(fail)?
                .map(|v| Value::String(base64::engine::general_purpose::STANDARD.encode(v)))
        }
        // Text types and anything else the driver can decode as a string
        _ => row.try_get::<_, Option<String>>(idx).map_err(fail)?.map(Value::String),
    };

    Ok(value.unwrap_or(Value::Null))
}
