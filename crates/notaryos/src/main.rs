//! `notaryos` - command-line client
//!
//! Each subcommand drives the same [`App`] the interactive shell uses. Toasts
//! raised while a command runs are printed once it finishes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use notaryos::cli::shell::{parse_line, ShellCommand, HELP};
use notaryos::cli::{Cli, Command, ConfigCommand, FeesCommand, ProfileCommand, ScheduleCommand};
use notaryos::helpers::{all_states, state_fees, StateFees};
use notaryos::screens::render_toasts;
use notaryos::{init_logging, App, Config, Error, View};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    if cli.command.is_offline() {
        let ok = match cli.command {
            Command::Config(cmd) => handle_config(&config, cmd)?,
            Command::Fees(cmd) => handle_fees(&cmd)?,
            _ => true,
        };
        return Ok(exit_code(ok));
    }

    let mut app = App::open(&config).context("opening storage")?;
    let outcome = run(&mut app, &config, cli.command).await;
    print_toasts(&app);

    match outcome {
        Ok(ok) => Ok(exit_code(ok)),
        Err(e) => match e.downcast_ref::<Error>() {
            Some(err) if err.is_user_facing() => {
                eprintln!("{err}");
                Ok(ExitCode::FAILURE)
            }
            _ => Err(e),
        },
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run one command. `Ok(false)` means the app refused it with a toast.
async fn run(app: &mut App, config: &Config, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Login(cmd) => {
            app.open_auth();
            if cmd.sign_up {
                app.toggle_auth_mode();
            }
            Ok(app.sign_in(&cmd.email, &cmd.password)?)
        }
        Command::Logout => {
            app.logout()?;
            println!("Signed out.");
            Ok(true)
        }
        Command::Status(cmd) => handle_status(app, config, cmd.json).await,
        Command::Dashboard => show(app, View::Dashboard).await,
        Command::Schedule(cmd) => handle_schedule(app, cmd).await,
        Command::Profile(cmd) => handle_profile(app, cmd),
        Command::Coach(cmd) => {
            app.navigate(View::Ai)?;
            if let Some(reply) = app.ask_coach(&cmd.question())? {
                reply.await.context("waiting for coach reply")?;
            }
            println!("{}", app.render().await?);
            Ok(true)
        }
        Command::Journal => show(app, View::Journal).await,
        Command::Shell => {
            run_shell(app).await?;
            Ok(true)
        }
        Command::Config(cmd) => handle_config(config, cmd),
        Command::Fees(cmd) => handle_fees(&cmd),
    }
}

async fn show(app: &mut App, view: View) -> anyhow::Result<bool> {
    app.navigate(view)?;
    println!("{}", app.render().await?);
    Ok(true)
}

fn print_toasts(app: &App) {
    let toasts = app.take_toasts();
    if !toasts.is_empty() {
        println!("{}", render_toasts(&toasts));
    }
}

async fn handle_status(app: &App, config: &Config, json: bool) -> anyhow::Result<bool> {
    let appointments = match app.user() {
        Some(_) => Some(app.schedule().await?.len()),
        None => None,
    };
    if json {
        let status = serde_json::json!({
            "signed_in": app.user().is_some(),
            "user": app.user(),
            "profile": app.profile_progress(),
            "appointments": appointments,
            "database_path": config.database_path(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("notaryos status");
        println!("---------------");
        match app.user() {
            Some(user) => println!("Signed in:     {} ({} plan)", user.email, user.plan),
            None => println!("Signed in:     no"),
        }
        if let Some(count) = appointments {
            println!("Appointments:  {count}");
        }
        println!("Database:      {}", config.database_path().display());
    }
    Ok(true)
}

async fn handle_schedule(app: &mut App, cmd: ScheduleCommand) -> anyhow::Result<bool> {
    match cmd {
        ScheduleCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&app.schedule().await?)?);
                Ok(true)
            } else {
                show(app, View::Schedule).await
            }
        }
        ScheduleCommand::Add(args) => {
            app.navigate(View::AddAppointment)?;
            match app.submit_appointment(args.into()).await? {
                Some(appt) => {
                    println!("Booked {} (id {})", appt.client_name, appt.id);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        ScheduleCommand::Pay { id } => Ok(app.mark_paid(&id).await?.is_some()),
        ScheduleCommand::Remove { id } => Ok(app.remove_appointment(&id).await?),
    }
}

fn handle_profile(app: &mut App, cmd: ProfileCommand) -> anyhow::Result<bool> {
    match cmd {
        ProfileCommand::Show { json } => {
            let user = app.user().ok_or(Error::NotSignedIn)?;
            let progress = app.profile_progress();
            if json {
                let profile = serde_json::json!({ "user": user, "progress": progress });
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("Email:         {}", user.email);
                println!("Name:          {}", user.greeting_name());
                println!("Phone:         {}", user.phone.as_deref().unwrap_or("-"));
                println!("Plan:          {}", user.plan);
                if !progress.completed {
                    println!("Missing:       {}", progress.missing().join(", "));
                }
            }
        }
        ProfileCommand::Set { name, phone } => {
            let user = app.update_profile(name, phone)?;
            println!("Profile saved for {}.", user.greeting_name());
        }
    }
    Ok(true)
}

fn handle_fees(cmd: &FeesCommand) -> anyhow::Result<bool> {
    let states: Vec<&StateFees> = match &cmd.state {
        Some(code) => match state_fees(code) {
            Some(entry) => vec![entry],
            None => {
                eprintln!("No fee data for '{code}'.");
                return Ok(false);
            }
        },
        None => all_states().iter().collect(),
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&states)?);
        return Ok(true);
    }
    for s in states {
        println!(
            "{}  {:<12} acknowledgment {:>7}  jurat {:>7}",
            s.code, s.state, s.fees.acknowledgment, s.fees.jurat
        );
        if let Some(note) = s.id_requirements {
            println!("    ID: {note}");
        }
    }
    Ok(true)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<bool> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Notifications]");
                println!("  Toast TTL (ms):     {}", config.notifications.toast_ttl_ms);
                println!();
                println!("[Coach]");
                println!("  Reply delay (ms):   {}", config.coach.reply_delay_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

async fn run_shell(app: &mut App) -> anyhow::Result<()> {
    println!("{}", app.render().await?);
    println!("(type 'help' for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        match shell_step(app, command).await {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) => match e.downcast_ref::<Error>() {
                Some(err) if err.is_user_facing() => eprintln!("{err}"),
                _ => return Err(e),
            },
        }
        print_toasts(app);
    }
    Ok(())
}

/// Apply one shell command and redraw. `Ok(false)` ends the session.
async fn shell_step(app: &mut App, command: ShellCommand) -> anyhow::Result<bool> {
    match command {
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Help => {
            println!("{HELP}");
            return Ok(true);
        }
        ShellCommand::Fees(state) => {
            handle_fees(&FeesCommand { state, json: false })?;
            return Ok(true);
        }
        ShellCommand::Render => {}
        ShellCommand::Login => app.open_auth(),
        ShellCommand::Back => app.close_auth(),
        ShellCommand::Toggle => {
            app.toggle_auth_mode();
        }
        ShellCommand::SignIn { email, password } => {
            app.sign_in(&email, &password)?;
        }
        ShellCommand::Logout => app.logout()?,
        ShellCommand::Go(view) => app.navigate(view)?,
        ShellCommand::New(draft) => {
            app.submit_appointment(draft).await?;
        }
        ShellCommand::Cancel => app.cancel_appointment()?,
        ShellCommand::Pay(id) => {
            app.mark_paid(&id).await?;
        }
        ShellCommand::Remove(id) => {
            app.remove_appointment(&id).await?;
        }
        ShellCommand::Ask(question) => {
            if let Some(reply) = app.ask_coach(&question)? {
                println!("{}", app.render().await?);
                println!("coach is typing...");
                reply.await.context("waiting for coach reply")?;
            }
        }
        ShellCommand::Name(name) => {
            app.update_profile(Some(name), None)?;
        }
        ShellCommand::Phone(phone) => {
            app.update_profile(None, Some(phone))?;
        }
    }
    println!("{}", app.render().await?);
    Ok(true)
}
