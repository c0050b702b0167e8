//! Command-line interface for notaryos.
//!
//! This module provides the CLI structure for the `notaryos` binary and the
//! line parser for its interactive shell.

mod commands;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddAppointmentArgs, CoachCommand, ConfigCommand, FeesCommand, LoginCommand, ProfileCommand,
    ScheduleCommand, StatusCommand,
};

/// notaryos - The operating system for modern notaries
///
/// Schedule signings, track what you've been paid, and look up state fees.
/// Run `notaryos shell` for the interactive client.
#[derive(Debug, Parser)]
#[command(name = "notaryos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (or sign up) with the demo flow
    Login(LoginCommand),

    /// Sign out and forget the stored session
    Logout,

    /// Show session and storage status
    Status(StatusCommand),

    /// Show revenue and pending jobs
    Dashboard,

    /// List and manage appointments
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// View or update your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Look up notary fees by state
    Fees(FeesCommand),

    /// Ask the AI coach a question
    Coach(CoachCommand),

    /// Open the journal
    Journal,

    /// Start the interactive client
    Shell,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command runs without opening the database.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Fees(_))
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "notaryos");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "notaryos", "login", "--email", "a@b.com", "--password", "pw", "--sign-up",
        ])
        .unwrap();
        match cli.command {
            Command::Login(cmd) => {
                assert_eq!(cmd.email, "a@b.com");
                assert_eq!(cmd.password, "pw");
                assert!(cmd.sign_up);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_schedule_add() {
        let cli = Cli::try_parse_from([
            "notaryos", "schedule", "add", "--client", "Ann Lee", "--date", "2024-05-01",
            "--time", "09:30", "--type", "Jurat", "--fee", "25",
        ])
        .unwrap();
        match cli.command {
            Command::Schedule(ScheduleCommand::Add(args)) => {
                assert_eq!(args.client, "Ann Lee");
                assert_eq!(args.service_type, "Jurat");
                assert_eq!(args.fee, "25");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_schedule_add_optional_fields() {
        let cli = Cli::try_parse_from([
            "notaryos", "schedule", "add", "--client", "Bo", "--date", "2024-05-01", "--time",
            "10:00",
        ])
        .unwrap();
        let Command::Schedule(ScheduleCommand::Add(args)) = cli.command else {
            panic!("expected schedule add");
        };
        assert!(args.service_type.is_empty());
        assert!(args.fee.is_empty());
    }

    #[test]
    fn test_parse_schedule_pay() {
        let cli = Cli::try_parse_from(["notaryos", "schedule", "pay", "1700000000000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Schedule(ScheduleCommand::Pay { ref id }) if id == "1700000000000"
        ));
    }

    #[test]
    fn test_parse_coach_joins_words() {
        let cli = Cli::try_parse_from(["notaryos", "coach", "fees", "in", "Texas?"]).unwrap();
        let Command::Coach(cmd) = cli.command else {
            panic!("expected coach");
        };
        assert_eq!(cmd.question(), "fees in Texas?");
    }

    #[test]
    fn test_parse_fees() {
        let cli = Cli::try_parse_from(["notaryos", "fees", "CA"]).unwrap();
        assert!(cli.command.is_offline());

        let cli = Cli::try_parse_from(["notaryos", "fees"]).unwrap();
        assert!(matches!(cli.command, Command::Fees(FeesCommand { state: None, .. })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["notaryos", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(!cli.command.is_offline());
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["notaryos", "-vv", "dashboard"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["notaryos", "-q", "journal"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_login_requires_email() {
        assert!(Cli::try_parse_from(["notaryos", "login", "--password", "pw"]).is_err());
    }
}
