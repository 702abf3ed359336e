//! Terminal output for dashboard sections and notifications

use admin_ops::{DashboardSnapshot, PurgeOutcome, PurgeTarget, Section};
use chrono::{DateTime, NaiveDateTime};
use colored::Colorize;
use serde::Serialize;
use shared::{ChatSessionSummary, Consultation, ConsultationStats, ConsultationStatus, LogEntry, TeamMember};
use tabled::{Table, Tabled};

use crate::OutputFormat;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Consultation ID")]
    consultation_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Company")]
    company: String,
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

#[derive(Tabled)]
struct ConsultationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Session ID")]
    session_id: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Messages")]
    messages: u64,
}

/// Format a backend timestamp for display
pub fn format_timestamp(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    match NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn status_colored(status: &ConsultationStatus) -> colored::ColoredString {
    match status {
        ConsultationStatus::Pending => status.as_str().yellow(),
        ConsultationStatus::Confirmed => status.as_str().blue(),
        ConsultationStatus::Completed => status.as_str().green(),
        ConsultationStatus::Cancelled => status.as_str().red(),
        ConsultationStatus::Other(s) => s.normal(),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}

pub fn print_stats(stats: &Section<ConsultationStats>) {
    println!("{}", "Statistics".bold());
    match stats {
        Ok(s) => {
            println!("  Total requests:     {}", s.total_requests);
            println!("  Pending:            {}", s.pending_requests.to_string().yellow());
            println!("  Confirmed:          {}", s.confirmed_requests.to_string().blue());
            println!("  Completed:          {}", s.completed_requests.to_string().green());
            println!("  Cancelled:          {}", s.cancelled_requests.to_string().red());
            println!("  Last 7 days:        {}", s.recent_requests_7_days);
        }
        Err(e) => println!("  {} {}", "Error".red(), e),
    }
}

pub fn print_logs(logs: &Section<Vec<LogEntry>>, format: OutputFormat) {
    println!("{}", "Consultation logs".bold());
    let logs = match logs {
        Ok(l) => l,
        Err(e) => {
            println!("  {} {}", "Error loading logs".red(), e);
            return;
        }
    };
    if logs.is_empty() {
        println!("  No logs found");
        return;
    }
    match format {
        OutputFormat::Table => {
            let rows: Vec<LogRow> = logs
                .iter()
                .map(|l| LogRow {
                    timestamp: format_timestamp(&l.timestamp),
                    action: l.action.clone(),
                    consultation_id: l.consultation_id.clone(),
                    name: l.user_name.clone(),
                    email: l.user_email.clone(),
                    status: l.status.clone(),
                    company: or_dash(&l.company),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        _ => {
            for l in logs {
                println!(
                    "  {}  {:<10} {}  {} <{}>  [{}]",
                    format_timestamp(&l.timestamp).dimmed(),
                    l.action,
                    l.consultation_id.cyan(),
                    l.user_name,
                    l.user_email,
                    l.status
                );
            }
        }
    }
}

pub fn print_team(team: &Section<Vec<TeamMember>>, format: OutputFormat) {
    println!("{}", "Team members".bold());
    let team = match team {
        Ok(t) => t,
        Err(e) => {
            println!("  {} {}", "Error loading team members".red(), e);
            return;
        }
    };
    if team.is_empty() {
        println!("  No team members");
        return;
    }
    match format {
        OutputFormat::Table => {
            let rows: Vec<TeamRow> = team
                .iter()
                .map(|m| TeamRow {
                    name: m.name.clone(),
                    email: m.email.clone(),
                    role: m.role.clone(),
                    phone: or_dash(&m.phone),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        _ => {
            for m in team {
                println!("  {} <{}>  {}", m.name.bold(), m.email.cyan(), m.role);
            }
        }
    }
}

pub fn print_consultations(consultations: &Section<Vec<Consultation>>, format: OutputFormat) {
    println!("{}", "Consultation requests".bold());
    let consultations = match consultations {
        Ok(c) => c,
        Err(e) => {
            println!("  {} {}", "Error loading consultations".red(), e);
            return;
        }
    };
    if consultations.is_empty() {
        println!("  No consultation requests");
        return;
    }
    match format {
        OutputFormat::Table => {
            let rows: Vec<ConsultationRow> = consultations
                .iter()
                .map(|c| ConsultationRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    email: c.email.clone(),
                    date: or_dash(&c.preferred_date),
                    time: or_dash(&c.preferred_time),
                    status: c.status.to_string(),
                    created: format_timestamp(&c.created_at),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        _ => {
            for c in consultations {
                println!(
                    "\n  {} {}  {}",
                    c.id.cyan(),
                    c.name.bold(),
                    status_colored(&c.status)
                );
                println!("    Email: {}", c.email);
                if !c.company.is_empty() {
                    println!("    Company: {}", c.company);
                }
                println!(
                    "    Preferred: {} {}",
                    or_dash(&c.preferred_date),
                    c.preferred_time
                );
                println!("    Created: {}", format_timestamp(&c.created_at));
            }
        }
    }
}

pub fn print_sessions(sessions: &[ChatSessionSummary], format: OutputFormat) {
    if sessions.is_empty() {
        println!("No sessions found");
        return;
    }
    match format {
        OutputFormat::Table => {
            let rows: Vec<SessionRow> = sessions
                .iter()
                .map(|s| SessionRow {
                    session_id: s.session_id.clone(),
                    created: s
                        .created_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                    messages: s.message_count,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        _ => {
            println!("{} {} session(s):", "Found".bold(), sessions.len());
            for s in sessions {
                println!(
                    "  {} {} ({} messages)",
                    "●".green(),
                    s.session_id.bold(),
                    s.message_count
                );
            }
        }
    }
}

pub fn print_snapshot(snapshot: &DashboardSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        return print_json(snapshot);
    }
    print_stats(&snapshot.stats);
    println!();
    print_logs(&snapshot.logs, format);
    println!();
    print_team(&snapshot.team, format);
    println!();
    print_consultations(&snapshot.consultations, format);
    Ok(())
}

pub fn print_purge_outcome(outcome: &PurgeOutcome, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        return print_json(outcome);
    }
    success(&outcome.summary());
    for target in PurgeTarget::SWEEP_ORDER {
        let failed = outcome.errors_for(target);
        let line = format!(
            "  {:<14} deleted {:>4}",
            target.label(),
            outcome.deleted_for(target)
        );
        if failed > 0 {
            println!("{}  {}", line, format!("failed {}", failed).yellow());
        } else {
            println!("{}", line);
        }
    }
    if let Some(cleared) = outcome.logs_cleared {
        println!("  {} log entries cleared in bulk", cleared);
    }
    if outcome.log_fallback_used {
        println!("  {}", "Bulk log clear unavailable; logs were counted, not removed".yellow());
    }
    if outcome.exempted > 0 {
        println!("  {} protected team member(s) kept", outcome.exempted);
    }
    Ok(())
}
