//! View routing inside the authenticated shell.
//!
//! A single current view, no history. The names below are also what the
//! shell accepts on its `go` command.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A screen inside the authenticated shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum View {
    /// Revenue and pending-job summary.
    #[default]
    #[serde(rename = "dashboard")]
    Dashboard,
    /// Appointment list.
    #[serde(rename = "schedule")]
    Schedule,
    /// New appointment form.
    #[serde(rename = "Add Appointment")]
    AddAppointment,
    /// AI coach chat.
    #[serde(rename = "ai")]
    Ai,
    /// Journal placeholder.
    #[serde(rename = "journal")]
    Journal,
}

impl View {
    /// Every view, in navigation order.
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Schedule,
        View::AddAppointment,
        View::Ai,
        View::Journal,
    ];

    /// Identifier of this view.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Schedule => "schedule",
            Self::AddAppointment => "Add Appointment",
            Self::Ai => "ai",
            Self::Journal => "journal",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A view name that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}'")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// One entry of the sidebar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// Target view.
    pub view: View,
    /// Label shown to the user.
    pub label: &'static str,
}

/// Sidebar navigation, top to bottom. The form is reached from its own
/// "New Job" / "+ Add" actions rather than from the sidebar.
pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        view: View::Dashboard,
        label: "Dashboard",
    },
    NavItem {
        view: View::Schedule,
        label: "Schedule",
    },
    NavItem {
        view: View::Journal,
        label: "Journal",
    },
    NavItem {
        view: View::Ai,
        label: "AI Coach",
    },
];

/// Top-level screen: which tree is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Marketing page shown to signed-out visitors.
    Landing,
    /// Sign-in / sign-up form.
    Auth,
    /// The app shell showing a view.
    Shell(View),
}

/// Holds the current view.
#[derive(Debug, Clone, Default)]
pub struct Router {
    current: View,
}

impl Router {
    /// Router positioned on the dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view.
    #[must_use]
    pub fn current(&self) -> View {
        self.current
    }

    /// Switch to `view`.
    pub fn navigate(&mut self, view: View) {
        if view != self.current {
            debug!(from = %self.current, to = %view, "navigate");
        }
        self.current = view;
    }
}
