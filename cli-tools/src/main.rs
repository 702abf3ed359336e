//! consult-admin - operator CLI for the consultation backend
//!
//! Covers the admin dashboard (stats, logs, team, consultations), chat
//! sessions, consultation scheduling, and the confirmed full data purge.

mod client;
mod config;
mod prompt;
mod render;

use admin_ops::{
    load_logs, load_snapshot, ChatController, ChatOutcome, ConfirmationGate, ContactDetails,
    PurgeError, PurgeOrchestrator, SlotPicker,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use shared::api::ApiClientConfig;
use shared::{ChatResponse, ConsultApi, ConsultationStatus, TeamMember};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::NativeApiClient;
use config::{CliOverrides, Settings};

#[derive(Parser)]
#[command(name = "consult-admin")]
#[command(about = "Admin CLI for the consultation backend", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(short, long, env = "CONSULT_API_BASE")]
    server: Option<String>,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, env = "CONSULT_API_TIMEOUT")]
    timeout: Option<u64>,

    /// Team member that a purge never removes
    #[arg(long, env = "CONSULT_PROTECTED_EMAIL")]
    protected_email: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Show stats, logs, team and consultations together
    Dashboard {
        /// Log window in hours
        #[arg(long)]
        hours: Option<u32>,
        /// Only logs in this status (overrides --hours)
        #[arg(long)]
        status: Option<String>,
    },

    /// Consultation statistics
    Stats,

    /// Consultation logs
    Logs {
        /// Log window in hours
        #[arg(long)]
        hours: Option<u32>,
        /// Only logs in this status (overrides --hours)
        #[arg(long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD); requires --to
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Team member management
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Consultation request management
    Consultations {
        #[command(subcommand)]
        action: ConsultationAction,
    },

    /// Chat session management
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show open consultation slots
    Slots {
        /// Only list times for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Book a consultation
    Schedule {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        message: String,
    },

    /// Talk to the assistant
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },

    /// Delete all consultations, logs, team members and chat sessions
    Purge {
        /// Confirmation phrase, instead of typing it interactively
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand)]
enum TeamAction {
    /// List team members
    List,
    /// Add a team member
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Remove a team member
    Remove {
        email: String,
        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConsultationAction {
    /// List consultation requests
    List,
    /// Change the status of a request
    SetStatus {
        id: String,
        /// pending, confirmed, completed or cancelled
        status: String,
    },
    /// Delete a request
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List chat sessions
    List,
    /// Show a session's history
    Get { id: String },
    /// Delete a session
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send one message
    Send {
        message: String,
        /// Continue this session instead of starting a new one
        #[arg(long)]
        session: Option<String>,
        /// Use the widget session id prefix
        #[arg(long)]
        widget: bool,
    },
    /// Show the messages of a session
    History { id: String },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "consult_admin=debug,admin_ops=debug"
    } else {
        "consult_admin=info,admin_ops=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::resolve(
        config::load_config(),
        CliOverrides {
            server: cli.server.clone(),
            timeout_secs: cli.timeout,
            protected_email: cli.protected_email.clone(),
        },
    );
    tracing::debug!(?settings, "Resolved settings");

    let mut api_config = ApiClientConfig::new(&settings.api_base);
    if let Some(timeout) = settings.timeout {
        api_config = api_config.with_timeout(timeout);
    }
    let client = NativeApiClient::new(api_config)?;
    let format = cli.format;

    match cli.command {
        Commands::Dashboard { hours, status } => {
            let filter = settings.log_filter(hours, status.as_deref());
            let snapshot = load_snapshot(&client, &filter).await;
            render::print_snapshot(&snapshot, format)?;
        }

        Commands::Stats => {
            let stats = client.stats().await.map_err(|e| e.to_string());
            match format {
                OutputFormat::Json => render::print_json(&stats)?,
                _ => render::print_stats(&stats),
            }
        }

        Commands::Logs {
            hours,
            status,
            from,
            to,
        } => {
            let logs = match (from, to) {
                (Some(from), Some(to)) => client.logs_by_date_range(&from, &to).await,
                _ => load_logs(&client, &settings.log_filter(hours, status.as_deref())).await,
            }
            .map_err(|e| e.to_string());
            match format {
                OutputFormat::Json => render::print_json(&logs)?,
                _ => render::print_logs(&logs, format),
            }
        }

        Commands::Team { action } => run_team(&client, action, format).await?,

        Commands::Consultations { action } => run_consultations(&client, action, format).await?,

        Commands::Sessions { action } => match action {
            SessionAction::List => {
                let sessions = client.list_sessions().await?;
                match format {
                    OutputFormat::Json => render::print_json(&sessions)?,
                    _ => render::print_sessions(&sessions, format),
                }
            }
            SessionAction::Get { id } => show_session(&client, &id, format).await?,
            SessionAction::Delete { id, yes } => {
                if !yes && !ask(&format!("Delete session {}?", id))? {
                    return Ok(());
                }
                client.delete_session(&id).await?;
                render::success(&format!("Session {} deleted", id));
                render::print_sessions(&client.list_sessions().await?, format);
            }
        },

        Commands::Slots { date } => {
            let picker = SlotPicker::new(client.available_slots().await?);
            print_slots(picker, date.as_deref());
        }

        Commands::Schedule {
            name,
            email,
            date,
            time,
            phone,
            company,
            message,
        } => {
            let contact = ContactDetails {
                name,
                email,
                phone,
                company,
                message,
            };
            run_schedule(&client, contact, &date, &time).await?;
        }

        Commands::Chat { action } => match action {
            ChatAction::Send {
                message,
                session,
                widget,
            } => {
                let mut chat = match session {
                    Some(id) => ChatController::resume(&client, id),
                    None if widget => ChatController::new(&client, "widget_session"),
                    None => ChatController::new(&client, "session"),
                };
                match chat.send(&message).await? {
                    ChatOutcome::Empty => bail!("Message is empty"),
                    ChatOutcome::ScheduleRequested => {
                        eprintln!("Opening the scheduling flow for you...");
                        show_schedule_options(&client, format).await?;
                    }
                    ChatOutcome::Reply {
                        response,
                        schedule_intent,
                    } => {
                        print_chat_reply(&response, format)?;
                        if schedule_intent {
                            show_schedule_options(&client, format).await?;
                        }
                        eprintln!("{} {}", "session:".dimmed(), chat.session_id());
                    }
                }
            }
            ChatAction::History { id } => show_session(&client, &id, format).await?,
        },

        Commands::Purge { confirm } => run_purge(&client, &settings, confirm, format).await?,
    }

    Ok(())
}

fn print_chat_reply(resp: &ChatResponse, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return render::print_json(resp);
    }
    println!("{}", resp.response);
    if let Some(sources) = resp.sources.as_ref().filter(|s| !s.is_empty()) {
        println!("\n{}", "Sources:".bold());
        for source in sources {
            let label = source
                .get("title")
                .or_else(|| source.get("source"))
                .map(String::as_str)
                .unwrap_or("-");
            println!("  - {}", label);
        }
    }
    Ok(())
}

/// Open dates to book from, shown when the conversation turns to scheduling
async fn show_schedule_options(client: &NativeApiClient, format: OutputFormat) -> Result<()> {
    let slots = client.available_slots().await?;
    if let OutputFormat::Json = format {
        return render::print_json(&slots);
    }
    println!();
    print_slots(SlotPicker::new(slots), None);
    println!(
        "\nBook with: consult-admin schedule --name <name> --email <email> --date <YYYY-MM-DD> --time <time>"
    );
    Ok(())
}

async fn show_session(client: &NativeApiClient, id: &str, format: OutputFormat) -> Result<()> {
    let session = client.get_session(id).await?;
    match format {
        OutputFormat::Json => render::print_json(&session)?,
        _ => {
            println!("{} {}", "Session:".bold(), session.session_id);
            if let Some(created) = &session.created_at {
                println!("  Created: {}", render::format_timestamp(created));
            }
            println!("  Messages: {}", session.message_count);
            for turn in &session.messages {
                println!("\n  {}", turn.role.bold());
                println!("  {}", turn.content);
            }
        }
    }
    Ok(())
}

fn ask(question: &str) -> Result<bool> {
    Ok(prompt::confirm(question, std::io::stdin().lock(), std::io::stdout())?)
}

async fn run_team(client: &NativeApiClient, action: TeamAction, format: OutputFormat) -> Result<()> {
    match action {
        TeamAction::List => {
            let team = client.list_team().await.map_err(|e| e.to_string());
            match format {
                OutputFormat::Json => render::print_json(&team)?,
                _ => render::print_team(&team, format),
            }
        }
        TeamAction::Add {
            name,
            email,
            role,
            phone,
        } => {
            let member = TeamMember {
                name,
                email,
                role,
                phone,
            };
            let resp = client
                .add_team_member(&member)
                .await
                .context("Error adding team member")?;
            render::success(&resp.message);
            render::print_team(&client.list_team().await.map_err(|e| e.to_string()), format);
        }
        TeamAction::Remove { email, yes } => {
            if !yes && !ask("Are you sure you want to remove this team member?")? {
                return Ok(());
            }
            client
                .remove_team_member(&email)
                .await
                .context("Error removing team member")?;
            render::success(&format!("Team member {} removed", email));
            render::print_team(&client.list_team().await.map_err(|e| e.to_string()), format);
        }
    }
    Ok(())
}

async fn run_consultations(
    client: &NativeApiClient,
    action: ConsultationAction,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConsultationAction::List => {
            let consultations = client.list_consultations().await.map_err(|e| e.to_string());
            match format {
                OutputFormat::Json => render::print_json(&consultations)?,
                _ => render::print_consultations(&consultations, format),
            }
        }
        ConsultationAction::SetStatus { id, status } => {
            let resp = client
                .update_consultation_status(&id, &ConsultationStatus::from(status))
                .await
                .context("Error updating status")?;
            render::success(&resp.message);
            let consultations = client.list_consultations().await.map_err(|e| e.to_string());
            render::print_consultations(&consultations, format);
        }
        ConsultationAction::Delete { id, yes } => {
            if !yes && !ask(&format!("Delete consultation {}?", id))? {
                return Ok(());
            }
            client
                .delete_consultation(&id)
                .await
                .context("Error deleting consultation")?;
            render::success(&format!("Consultation {} deleted", id));
            let consultations = client.list_consultations().await.map_err(|e| e.to_string());
            render::print_consultations(&consultations, format);
        }
    }
    Ok(())
}

fn print_slots(mut picker: SlotPicker, date: Option<&str>) {
    if !picker.has_dates() {
        println!("No available dates");
        return;
    }
    let tz = picker.timezone().unwrap_or("local").to_string();
    match date {
        None => {
            println!("{} ({})", "Available dates".bold(), tz);
            for option in picker.date_options() {
                println!("  {}  {}", option.value.cyan(), option.label);
            }
        }
        Some(day) => match picker.select_date(day) {
            Ok(times) => {
                println!("{} {} ({})", "Open times on".bold(), day, tz);
                for t in times {
                    println!("  {}", t);
                }
            }
            Err(e) => println!("{}", e),
        },
    }
}

async fn run_schedule(
    client: &NativeApiClient,
    contact: ContactDetails,
    date: &str,
    time: &str,
) -> Result<()> {
    let mut picker = SlotPicker::new(client.available_slots().await?);
    picker.select_date(date)?;
    picker.select_time(time)?;
    let request = picker.schedule_request(contact)?;

    let resp = client.schedule_consultation(&request).await?;
    if resp.success {
        render::success(&resp.message);
        if let Some(next) = &resp.next_steps {
            println!("  {}", next);
        }
        return Ok(());
    }

    render::failure(&resp.message);
    if resp.is_slot_conflict() {
        let refreshed = SlotPicker::new(client.available_slots().await?);
        print_slots(refreshed, Some(date));
    }
    bail!("Consultation was not scheduled")
}

async fn run_purge(
    client: &NativeApiClient,
    settings: &Settings,
    confirm: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut gate = ConfirmationGate::new();
    let confirmed = match confirm {
        Some(text) => Some(prompt::confirm_phrase(&mut gate, &text)?),
        None => {
            println!(
                "{} This permanently deletes all consultations, logs, team members and chat sessions.",
                "WARNING:".red().bold()
            );
            prompt::read_confirmation(&mut gate, std::io::stdin().lock(), std::io::stdout())?
        }
    };
    let Some(confirmed) = confirmed else {
        println!("Purge cancelled");
        return Ok(());
    };

    let orchestrator =
        PurgeOrchestrator::new(client).with_protected_email(settings.protected_email.clone());
    match orchestrator.purge(confirmed).await {
        Ok(outcome) => {
            render::print_purge_outcome(&outcome, format)?;
            if !matches!(format, OutputFormat::Json) {
                tokio::time::sleep(settings.refresh_delay).await;
                let snapshot = load_snapshot(client, &settings.log_filter(None, None)).await;
                println!();
                render::print_snapshot(&snapshot, format)?;
            }
            Ok(())
        }
        Err(e) => {
            if let PurgeError::Aborted { partial, .. } = &e {
                tracing::debug!(?partial, "Counters at abort");
            }
            render::failure(&format!("Error during deletion process: {}", e));
            Err(e.into())
        }
    }
}
