//! Menu Action Handlers
//!
//! One function per menu entry. View handlers run one SELECT and print a
//! table. Add and update handlers first query the lists they offer for
//! selection, collect the remaining fields, then run one INSERT or UPDATE and
//! print a one-line confirmation.
//!
//! Database errors are returned unchanged; handling them is the caller's
//! decision (see [`crate::app::run`]).

use std::io::Write;

use tracing::debug;

use crate::engine::{EmployeeStore, NewEmployee, NewRole, TableView};
use crate::error::{Result, TrackerError};
use crate::menu::MenuChoice;
use crate::output::render_table;
use crate::prompt::Prompter;

/// Label of the "no manager" entry in the manager selection list
pub const NO_MANAGER: &str = "None";

/// What the menu loop does after a dispatched choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again
    Continue,
    /// Leave the loop
    Quit,
}

/// Run the handler for `choice`
pub async fn dispatch<S, P, W>(
    choice: MenuChoice,
    store: &S,
    prompter: &mut P,
    out: &mut W,
) -> Result<Flow>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    debug!(%choice, "dispatch");
    match choice {
        MenuChoice::ViewDepartments => view_departments(store, out).await?,
        MenuChoice::ViewRoles => view_roles(store, out).await?,
        MenuChoice::ViewEmployees => view_employees(store, out).await?,
        MenuChoice::AddDepartment => add_department(store, prompter, out).await?,
        MenuChoice::AddRole => add_role(store, prompter, out).await?,
        MenuChoice::AddEmployee => add_employee(store, prompter, out).await?,
        MenuChoice::UpdateEmployeeRole => update_employee_role(store, prompter, out).await?,
        MenuChoice::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub async fn view_departments<S: EmployeeStore, W: Write>(store: &S, out: &mut W) -> Result<()> {
    print_table(out, &store.view_departments().await?)
}

pub async fn view_roles<S: EmployeeStore, W: Write>(store: &S, out: &mut W) -> Result<()> {
    print_table(out, &store.view_roles().await?)
}

pub async fn view_employees<S: EmployeeStore, W: Write>(store: &S, out: &mut W) -> Result<()> {
    print_table(out, &store.view_employees().await?)
}

pub async fn add_department<S, P, W>(store: &S, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    let name = prompter.text("Enter the name of the department:")?;

    let id = store.add_department(&name).await?;
    debug!(id, "department added");

    writeln!(out, "Added {name} to departments.")?;
    Ok(())
}

pub async fn add_role<S, P, W>(store: &S, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    let departments = store.list_departments().await?;
    if departments.is_empty() {
        return Err(TrackerError::invalid_input(
            "No departments exist yet; add a department before adding a role",
        ));
    }

    let title = prompter.text("Enter the title of the role:")?;
    let salary = prompter.number("Enter the salary for the role:")?;

    let names: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();
    let Some(idx) = prompter.select("Select the department for the role:", &names)? else {
        return cancelled(out);
    };

    let role = NewRole { title, salary, department_id: departments[idx].id };
    let id = store.add_role(&role).await?;
    debug!(id, "role added");

    writeln!(out, "Added {} to roles.", role.title)?;
    Ok(())
}

pub async fn add_employee<S, P, W>(store: &S, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    let roles = store.list_roles().await?;
    if roles.is_empty() {
        return Err(TrackerError::invalid_input(
            "No roles exist yet; add a role before adding an employee",
        ));
    }
    let employees = store.list_employees().await?;

    let first_name = prompter.text("Enter the employee's first name:")?;
    let last_name = prompter.text("Enter the employee's last name:")?;

    let titles: Vec<String> = roles.iter().map(|r| r.title.clone()).collect();
    let Some(role_idx) = prompter.select("Select the employee's role:", &titles)? else {
        return cancelled(out);
    };

    let mut managers = Vec::with_capacity(employees.len() + 1);
    managers.push(NO_MANAGER.to_string());
    managers.extend(employees.iter().map(|e| e.full_name()));
    let Some(manager_idx) = prompter.select("Select the employee's manager:", &managers)? else {
        return cancelled(out);
    };

    let employee = NewEmployee {
        first_name,
        last_name,
        role_id: roles[role_idx].id,
        // Entry 0 is NO_MANAGER
        manager_id: manager_idx.checked_sub(1).map(|i| employees[i].id),
    };
    let id = store.add_employee(&employee).await?;
    debug!(id, "employee added");

    writeln!(out, "Added {} {} to employees.", employee.first_name, employee.last_name)?;
    Ok(())
}

pub async fn update_employee_role<S, P, W>(store: &S, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: EmployeeStore,
    P: Prompter,
    W: Write,
{
    let employees = store.list_employees().await?;
    if employees.is_empty() {
        return Err(TrackerError::invalid_input("No employees exist yet; add an employee first"));
    }
    let roles = store.list_roles().await?;
    if roles.is_empty() {
        return Err(TrackerError::invalid_input("No roles exist yet; add a role first"));
    }

    let names: Vec<String> = employees.iter().map(|e| e.full_name()).collect();
    let Some(employee_idx) = prompter.select("Select the employee to update:", &names)? else {
        return cancelled(out);
    };

    let titles: Vec<String> = roles.iter().map(|r| r.title.clone()).collect();
    let Some(role_idx) = prompter.select("Select the employee's new role:", &titles)? else {
        return cancelled(out);
    };

    let employee = &employees[employee_idx];
    let role = &roles[role_idx];
    let updated = store.update_employee_role(employee.id, role.id).await?;

    if updated == 0 {
        // Removed by someone else between listing and updating
        writeln!(out, "No employee updated; {} no longer exists.", employee.full_name())?;
    } else {
        writeln!(out, "Updated {}'s role to {}.", employee.full_name(), role.title)?;
    }
    Ok(())
}

fn print_table<W: Write>(out: &mut W, view: &TableView) -> Result<()> {
    out.write_all(render_table(view).as_bytes())?;
    Ok(())
}

fn cancelled<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Cancelled.")?;
    Ok(())
}
