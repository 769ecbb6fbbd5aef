//! The fixed main menu

/// Prompt shown above the main menu
pub const MENU_PROMPT: &str = "What would you like to do?";

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    Quit,
}

impl MenuChoice {
    /// Every entry, in display order
    pub const ALL: [Self; 8] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::Quit,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ViewDepartments => "View all departments",
            Self::ViewRoles => "View all roles",
            Self::ViewEmployees => "View all employees",
            Self::AddDepartment => "Add a department",
            Self::AddRole => "Add a role",
            Self::AddEmployee => "Add an employee",
            Self::UpdateEmployeeRole => "Update an employee role",
            Self::Quit => "Quit",
        }
    }

    /// Labels in display order, as handed to the prompter
    #[must_use]
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.label().to_string()).collect()
    }

    /// Entry at a position of [`MenuChoice::ALL`]
    #[must_use]
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
