//! Text rendering of views
//!
//! Every function returns a `String` so output can be tested without a
//! terminal.

use crate::api::dto::{
    AnomalyKind, ChatMessage, ChatReply, ChatSession, DashboardMetrics, Integration, Settings,
    User,
};
use crate::app::ToggledIntegration;
use crate::guard::View;

/// Join lines, each terminated by a newline
fn lines(rows: Vec<String>) -> String {
    let mut out = rows.join("\n");
    out.push('\n');
    out
}

/// Public landing page
pub fn landing(user: Option<&User>) -> String {
    let mut out = vec![
        "Datalyn".to_string(),
        String::new(),
        "Stop guessing. Start knowing.".to_string(),
        "Datalyn is the AI-powered business analyst that connects to your data sources,"
            .to_string(),
        "detects what's wrong, and explains why.".to_string(),
        String::new(),
    ];

    match user {
        Some(user) => {
            out.push(format!("Signed in as {}. Open your dashboard with:", user.name));
            out.push("  datalyn dashboard".to_string());
        }
        None => {
            out.push("Get started:".to_string());
            out.push(format!("  {}", auth_usage(View::Signup)));
            out.push(format!("  {}", auth_usage(View::Login)));
        }
    }
    lines(out)
}

fn auth_usage(view: View) -> &'static str {
    match view {
        View::Signup => "datalyn signup --name <name> --email <email> --password <password>",
        _ => "datalyn login --email <email> --password <password>",
    }
}

/// Login or signup form, shown as the command that submits it
pub fn auth_form(view: View) -> String {
    lines(vec![view.title().to_string(), String::new(), format!("  {}", auth_usage(view))])
}

/// Page for a path that names no view
pub fn not_found(path: &str) -> String {
    lines(vec![
        format!("Page not found: {}", path),
        String::new(),
        "Known pages:".to_string(),
        View::ALL
            .iter()
            .map(|v| format!("  {:<14} {}", v.path(), v.title()))
            .collect::<Vec<_>>()
            .join("\n"),
    ])
}

pub fn user(user: &User) -> String {
    format!("{} <{}>\nID: {}\n", user.name, user.email, user.id)
}

/// Dashboard metric cards, revenue series and anomalies
pub fn dashboard(metrics: &DashboardMetrics) -> String {
    let cards = [
        (
            "Monthly Recurring Revenue",
            format_currency(metrics.mrr),
            metrics.mrr_change,
        ),
        (
            "Active Users",
            format_number(metrics.active_users),
            metrics.active_users_change,
        ),
        (
            "Conversions",
            format_number(metrics.conversions),
            metrics.conversions_change,
        ),
        (
            "Churn Rate",
            format_percent(metrics.churn_rate),
            metrics.churn_rate_change,
        ),
    ];

    let mut out: Vec<String> = cards
        .iter()
        .map(|(label, value, change)| {
            format!("{:<28} {:>12}  {}", label, value, format_change(*change))
        })
        .collect();

    if !metrics.chart_data.is_empty() {
        out.push(String::new());
        out.push("Revenue".to_string());
        out.push("-".repeat(40));
        out.extend(
            metrics
                .chart_data
                .iter()
                .map(|p| format!("{:<12} {:>14}", p.date, format_currency(p.revenue))),
        );
    }

    out.push(String::new());
    out.push("Anomalies".to_string());
    out.push("-".repeat(40));
    if metrics.anomalies.is_empty() {
        out.push("Nothing unusual detected.".to_string());
    }
    for anomaly in &metrics.anomalies {
        out.push(format!(
            "[{}] {} ({})",
            anomaly_label(anomaly.kind),
            anomaly.title,
            anomaly.timestamp
        ));
        out.push(format!("    {}", anomaly.description));
    }

    lines(out)
}

fn anomaly_label(kind: AnomalyKind) -> &'static str {
    match kind {
        AnomalyKind::Positive => "positive",
        AnomalyKind::Warning => "warning",
        AnomalyKind::Critical => "critical",
        AnomalyKind::Info => "info",
    }
}

/// Analyst reply, with reasoning steps when present
pub fn chat_reply(reply: &ChatReply) -> String {
    format!("{}\nSession: {}\n", chat_message(&reply.message), reply.session_id)
}

pub fn chat_message(message: &ChatMessage) -> String {
    let who = if message.is_assistant() { "Datalyn" } else { "You" };
    let when = message
        .created_at()
        .map(|t| format!(" [{}]", t.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();

    let mut out = vec![format!("{}{}:", who, when)];
    out.extend(message.content.lines().map(|line| format!("  {}", line)));

    if let Some(steps) = message.reasoning_steps.as_deref().filter(|s| !s.is_empty()) {
        out.push("  Reasoning:".to_string());
        out.extend(
            steps
                .iter()
                .map(|s| format!("    {}. {}: {}", s.step, s.title, s.description)),
        );
    }
    lines(out)
}

pub fn chat_history(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "No messages in this conversation.\n".to_string();
    }

    messages
        .iter()
        .map(chat_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn chat_sessions(sessions: &[ChatSession]) -> String {
    if sessions.is_empty() {
        return "No conversations yet.\n\nStart one with:\n  datalyn chat \"Why did revenue drop last week?\"\n"
            .to_string();
    }

    let mut out = vec![
        format!("{:<38} {:<26} {}", "Session", "Last updated", "Preview"),
        "-".repeat(90),
    ];
    out.extend(sessions.iter().map(|s| {
        format!(
            "{:<38} {:<26} {}",
            s.session_id,
            s.last_updated,
            truncate(&s.preview, 40)
        )
    }));
    lines(out)
}

pub fn integrations(integrations: &[Integration]) -> String {
    if integrations.is_empty() {
        return "No integrations available.\n".to_string();
    }

    let mut out = vec![
        format!("{:<14} {:<20} {:<14} {}", "ID", "Name", "Status", "Description"),
        "-".repeat(80),
    ];
    out.extend(integrations.iter().map(|i| {
        format!(
            "{:<14} {:<20} {:<14} {}",
            i.id,
            i.name,
            connection_label(i.connected),
            i.description
        )
    }));
    lines(out)
}

pub fn integration_toggled(toggled: &ToggledIntegration) -> String {
    format!(
        "{}: {} is now {}\n",
        toggled.message,
        toggled.integration.name,
        connection_label(toggled.integration.connected).to_lowercase()
    )
}

fn connection_label(connected: bool) -> &'static str {
    if connected {
        "Connected"
    } else {
        "Not connected"
    }
}

pub fn settings(settings: &Settings) -> String {
    lines(vec![
        format!("Name:                {}", settings.name),
        format!("Email:               {}", settings.email),
        format!(
            "Email notifications: {}",
            if settings.email_notifications { "on" } else { "off" }
        ),
        format!("Report schedule:     {}", settings.report_schedule),
    ])
}

/// `$20,100` style; cents are dropped
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(value.abs().round() as u64))
}

pub fn format_number(value: u64) -> String {
    group_thousands(value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Signed period-over-period change with a direction arrow
pub fn format_change(change: f64) -> String {
    let arrow = if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "="
    };
    format!("{} {:+.1}%", arrow, change)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
