use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

//
// ─── ROLES AND CAPABILITIES ───────────────────────────────────────────────────
//

/// Account role. Closed set; access decisions go through [`Role::capabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// Something a role is allowed to do in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    TakeTests,
    ViewOwnResults,
    ManageQuestions,
    ManageTests,
    MonitorTests,
    ViewAnalytics,
    ManageUsers,
}

/// Screens the client can show. Each one names the capability it needs, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppView {
    Dashboard,
    AvailableTests,
    TakeTest,
    Results,
    Monitoring,
}

impl AppView {
    #[must_use]
    pub const fn required_capability(self) -> Option<Capability> {
        match self {
            AppView::Dashboard => None,
            AppView::AvailableTests | AppView::TakeTest => Some(Capability::TakeTests),
            AppView::Results => Some(Capability::ViewOwnResults),
            AppView::Monitoring => Some(Capability::MonitorTests),
        }
    }
}

impl Role {
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Student => &[Capability::TakeTests, Capability::ViewOwnResults],
            Role::Teacher => &[
                Capability::ManageQuestions,
                Capability::ManageTests,
                Capability::MonitorTests,
                Capability::ViewAnalytics,
            ],
            Role::Admin => &[
                Capability::ManageQuestions,
                Capability::ManageTests,
                Capability::MonitorTests,
                Capability::ViewAnalytics,
                Capability::ManageUsers,
            ],
        }
    }

    #[must_use]
    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    #[must_use]
    pub fn can_view(self, view: AppView) -> bool {
        view.required_capability().is_none_or(|cap| self.has(cap))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
        }
    }
}

//
// ─── USER ─────────────────────────────────────────────────────────────────────
//

/// The signed-in account as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
}

impl User {
    /// Class name with surrounding whitespace removed; `None` when absent or blank.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
