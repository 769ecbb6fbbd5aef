//! Menu Loop Tests
//!
//! Runs the full loop with scripted answers: dispatch of every menu entry,
//! quitting, and what happens when a handler fails.

#![cfg(feature = "sqlite")]

mod common;

use common::{text, TestDb, UnavailableStore};
use emptrack::handlers::{self, Flow};
use emptrack::menu::MENU_PROMPT;
use emptrack::{
    run, Answer, EmployeeStore, MenuChoice, OnError, ScriptedPrompter, TrackerError,
};
use pretty_assertions::assert_eq;

/// Answers each handler needs after its menu entry is picked
fn handler_answers(choice: MenuChoice) -> Vec<Answer> {
    match choice {
        MenuChoice::ViewDepartments | MenuChoice::ViewRoles | MenuChoice::ViewEmployees => {
            Vec::new()
        }
        MenuChoice::AddDepartment => vec![Answer::text("Legal")],
        MenuChoice::AddRole => {
            vec![Answer::text("Auditor"), Answer::Number(70000.0), Answer::pick("Finance")]
        }
        MenuChoice::AddEmployee => vec![
            Answer::text("Edsger"),
            Answer::text("Dijkstra"),
            Answer::pick("Software Engineer"),
            Answer::pick("None"),
        ],
        MenuChoice::UpdateEmployeeRole => {
            vec![Answer::pick("Alan Turing"), Answer::pick("Accountant")]
        }
        MenuChoice::Quit => Vec::new(),
    }
}

fn script_for(choice: MenuChoice) -> ScriptedPrompter {
    let mut answers = vec![Answer::pick(choice.label())];
    answers.extend(handler_answers(choice));
    answers.push(Answer::pick(MenuChoice::Quit.label()));
    ScriptedPrompter::new(answers)
}

#[tokio::test]
async fn test_each_choice_runs_exactly_its_handler() {
    for choice in MenuChoice::ALL.into_iter().filter(|c| *c != MenuChoice::Quit) {
        let db = TestDb::seeded().await;
        let mut prompter = script_for(choice);
        let mut out = Vec::new();

        run(&db.store, &mut prompter, &mut out, OnError::Exit).await.unwrap();
        assert_eq!(prompter.remaining(), 0, "{choice}: script not fully consumed");

        let printed = text(&out);
        let (departments, roles, employees) = db.counts().await;
        let alan_role = db.store.list_employees().await.unwrap()[1].role_id;

        match choice {
            MenuChoice::ViewDepartments => {
                assert!(printed.contains("│ name"), "{choice}: {printed}");
                assert!(!printed.contains("title"));
            }
            MenuChoice::ViewRoles => {
                assert!(printed.contains("│ title") && printed.contains("department"));
                assert!(!printed.contains("first_name"));
            }
            MenuChoice::ViewEmployees => {
                assert!(printed.contains("first_name") && printed.contains("manager"));
            }
            MenuChoice::AddDepartment => assert_eq!(printed, "Added Legal to departments.\n"),
            MenuChoice::AddRole => assert_eq!(printed, "Added Auditor to roles.\n"),
            MenuChoice::AddEmployee => {
                assert_eq!(printed, "Added Edsger Dijkstra to employees.\n");
            }
            MenuChoice::UpdateEmployeeRole => {
                assert_eq!(printed, "Updated Alan Turing's role to Accountant.\n");
            }
            MenuChoice::Quit => unreachable!(),
        }

        // Only the chosen handler may have written
        let expected_counts = match choice {
            MenuChoice::AddDepartment => (3, 3, 2),
            MenuChoice::AddRole => (2, 4, 2),
            MenuChoice::AddEmployee => (2, 3, 3),
            _ => (2, 3, 2),
        };
        assert_eq!((departments, roles, employees), expected_counts, "{choice}");
        assert_eq!(alan_role == 3, choice == MenuChoice::UpdateEmployeeRole, "{choice}");
    }
}

#[tokio::test]
async fn test_menu_is_shown_again_after_each_action() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new([
        Answer::pick("View all departments"),
        Answer::pick("Add a department"),
        Answer::text("Legal"),
        Answer::pick("View all departments"),
        Answer::pick("Quit"),
    ]);
    let mut out = Vec::new();

    run(&db.store, &mut prompter, &mut out, OnError::Exit).await.unwrap();

    let menus: Vec<_> = prompter.shown().iter().filter(|s| s.prompt == MENU_PROMPT).collect();
    assert_eq!(menus.len(), 4);
    assert!(menus.iter().all(|m| m.items == MenuChoice::labels()));

    let printed = text(&out);
    assert_eq!(printed.matches("(index)").count(), 2);
    // The second table includes the department added in between
    let second_table = printed.split("Added Legal to departments.\n").nth(1).unwrap();
    assert!(second_table.contains("Legal"));
}

#[tokio::test]
async fn test_dispatch_quit_runs_no_handler() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new(Vec::<Answer>::new());
    let mut out = Vec::new();

    let flow = handlers::dispatch(MenuChoice::Quit, &db.store, &mut prompter, &mut out)
        .await
        .unwrap();

    assert_eq!(flow, Flow::Quit);
    assert!(prompter.shown().is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_dispatch_action_continues() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new(Vec::<Answer>::new());
    let mut out = Vec::new();

    let flow =
        handlers::dispatch(MenuChoice::ViewDepartments, &db.store, &mut prompter, &mut out)
            .await
            .unwrap();

    assert_eq!(flow, Flow::Continue);
    assert!(text(&out).contains("Engineering"));
}

#[tokio::test]
async fn test_quit_immediately() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new([Answer::pick("Quit")]);
    let mut out = Vec::new();

    run(&db.store, &mut prompter, &mut out, OnError::Exit).await.unwrap();

    assert!(out.is_empty());
    assert_eq!(prompter.shown().len(), 1);
}

#[tokio::test]
async fn test_cancelling_menu_quits() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new([Answer::Cancel, Answer::pick("Quit")]);
    let mut out = Vec::new();

    run(&db.store, &mut prompter, &mut out, OnError::Exit).await.unwrap();

    assert_eq!(prompter.remaining(), 1);
}

#[tokio::test]
async fn test_handler_error_stops_the_loop() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new([
        Answer::pick("Add a department"),
        Answer::text("Engineering"),
        Answer::pick("Quit"),
    ]);
    let mut out = Vec::new();

    let err = run(&db.store, &mut prompter, &mut out, OnError::Exit).await.unwrap_err();

    assert!(matches!(err, TrackerError::QueryFailed(_)));
    // The menu was not shown again
    assert_eq!(prompter.remaining(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_keep_going_reports_and_continues() {
    let db = TestDb::seeded().await;
    let mut prompter = ScriptedPrompter::new([
        Answer::pick("Add a department"),
        Answer::text("Engineering"),
        Answer::pick("Add a department"),
        Answer::text("Legal"),
        Answer::pick("Quit"),
    ]);
    let mut out = Vec::new();

    run(&db.store, &mut prompter, &mut out, OnError::Continue).await.unwrap();

    // The failure is reported on stderr; stdout only has the confirmation
    assert_eq!(text(&out), "Added Legal to departments.\n");
    assert_eq!(prompter.remaining(), 0);
    assert_eq!(db.counts().await, (3, 3, 2));
}

#[tokio::test]
async fn test_keep_going_still_stops_on_terminal_errors() {
    let db = TestDb::seeded().await;
    // Script runs dry inside the handler
    let mut prompter = ScriptedPrompter::new([Answer::pick("Add a department")]);
    let mut out = Vec::new();

    let err = run(&db.store, &mut prompter, &mut out, OnError::Continue).await.unwrap_err();
    assert!(matches!(err, TrackerError::TerminalFailed(_)));
}

#[tokio::test]
async fn test_unavailable_connection_is_fatal_for_every_handler() {
    for choice in MenuChoice::ALL.into_iter().filter(|c| *c != MenuChoice::Quit) {
        let mut answers = vec![Answer::pick(choice.label())];
        // Add department asks for its name before touching the database
        if choice == MenuChoice::AddDepartment {
            answers.push(Answer::text("Legal"));
        }
        answers.push(Answer::pick("Quit"));
        let mut prompter = ScriptedPrompter::new(answers);
        let mut out = Vec::new();

        let result = run(&UnavailableStore, &mut prompter, &mut out, OnError::Exit).await;

        let err = result.expect_err(choice.label());
        assert_eq!(err.error_code(), "CONNECTION_FAILED", "{choice}");
        assert_eq!(prompter.remaining(), 1, "{choice}: must not return to the menu");
        assert!(out.is_empty(), "{choice}: nothing printed");
    }
}
