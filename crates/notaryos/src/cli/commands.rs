//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::screens::AppointmentDraft;

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Email address (must contain '@')
    #[arg(short, long)]
    pub email: String,

    /// Password (any non-empty value)
    #[arg(short, long)]
    pub password: String,

    /// Use the sign-up form instead of sign-in
    #[arg(long)]
    pub sign_up: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Schedule commands.
#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// List appointments in the order they were booked
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Book a new appointment
    Add(AddAppointmentArgs),

    /// Mark an appointment as paid
    Pay {
        /// Appointment id
        id: String,
    },

    /// Delete an appointment
    Remove {
        /// Appointment id
        id: String,
    },
}

/// Fields of the new-appointment form.
#[derive(Debug, Args)]
pub struct AddAppointmentArgs {
    /// Client name
    #[arg(long)]
    pub client: String,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Time, 24-hour (HH:MM)
    #[arg(long)]
    pub time: String,

    /// Service type (e.g. "Loan Signing")
    #[arg(long = "type", default_value = "")]
    pub service_type: String,

    /// Fee in dollars
    #[arg(long, default_value = "")]
    pub fee: String,
}

impl From<AddAppointmentArgs> for AppointmentDraft {
    fn from(args: AddAppointmentArgs) -> Self {
        Self {
            client_name: args.client,
            date: args.date,
            time: args.time,
            service_type: args.service_type,
            fee: args.fee,
        }
    }
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in profile and what is missing
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Update profile fields (an empty value clears the field)
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Fee lookup arguments.
#[derive(Debug, Args)]
pub struct FeesCommand {
    /// Two-letter state code (all states when omitted)
    pub state: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Coach command arguments.
#[derive(Debug, Args)]
pub struct CoachCommand {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl CoachCommand {
    /// The question as one string.
    #[must_use]
    pub fn question(&self) -> String {
        self.words.join(" ")
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
