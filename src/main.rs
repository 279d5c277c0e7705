//! Datalyn CLI
//!
//! Command-line front end for the Datalyn client. Each command maps to a
//! view; gated views go through the route guard after the stored session
//! has been restored.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use datalyn::api::dto::{ReportSchedule, SettingsUpdate};
use datalyn::{logging, render, App, AppError, Config, Route, View};

#[derive(Parser)]
#[command(name = "datalyn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI-powered business analyst")]
#[command(long_about = "Datalyn connects to your data sources, detects what's wrong, and explains why.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, including the /api prefix
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the product overview
    Landing,

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Open a page by path, e.g. /dashboard
    Open { path: String },

    /// Show headline metrics and anomalies
    Dashboard,

    /// Ask the AI analyst a question
    Chat {
        message: String,
        /// Continue an existing conversation
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show the messages of a conversation
    ChatHistory { session: String },

    /// List recent conversations
    ChatSessions,

    /// List data source integrations
    Integrations,

    /// Connect or disconnect an integration
    IntegrationsToggle { id: String },

    /// Show account settings
    Settings,

    /// Update account settings
    SettingsUpdate {
        #[arg(long)]
        name: Option<String>,
        /// true or false
        #[arg(long)]
        email_notifications: Option<bool>,
        /// daily, weekly or monthly
        #[arg(long)]
        report_schedule: Option<ReportSchedule>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// View the command opens, if any
    fn view(&self) -> Option<View> {
        match self {
            Commands::Landing => Some(View::Landing),
            Commands::Login { .. } => Some(View::Login),
            Commands::Signup { .. } => Some(View::Signup),
            Commands::Dashboard => Some(View::Dashboard),
            Commands::Chat { .. } | Commands::ChatHistory { .. } | Commands::ChatSessions => {
                Some(View::Chat)
            }
            Commands::Integrations | Commands::IntegrationsToggle { .. } => {
                Some(View::Integrations)
            }
            Commands::Settings | Commands::SettingsUpdate { .. } => Some(View::Settings),
            Commands::Logout | Commands::Whoami | Commands::Open { .. } | Commands::Config { .. } => {
                None
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = datalyn::config::generate_default_config();

        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => {
                print!("{}", config);
            }
        }
        return Ok(());
    }

    // A broken config file is fatal; nothing below runs
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    logging::init(&config.logging);
    tracing::debug!(api = %config.api.base_url, "Datalyn CLI v{}", env!("CARGO_PKG_VERSION"));

    let app = App::new(&config)?;
    app.start().await;

    if let Some(view) = cli.command.view() {
        if !enter(&app, view, cli.format).await? {
            return Ok(());
        }
    }

    let format = cli.format;
    match cli.command {
        Commands::Landing => {
            let user = app.user();
            match format {
                Format::Json => print_json(&serde_json::json!({
                    "tagline": "Stop guessing. Start knowing.",
                    "user": user,
                }))?,
                Format::Text => print!("{}", render::landing(user.as_ref())),
            }
        }

        Commands::Login { email, password } => {
            let user = app.login(&email, &password).await.unwrap_or_else(|e| fail(e));
            eprintln!("Welcome back!");
            emit(format, &user, render::user)?;
        }

        Commands::Signup {
            name,
            email,
            password,
        } => {
            let user = app
                .signup(&name, &email, &password)
                .await
                .unwrap_or_else(|e| fail(e));
            eprintln!("Account created successfully!");
            emit(format, &user, render::user)?;
        }

        Commands::Logout => {
            app.logout().await;
            println!("Signed out");
        }

        Commands::Whoami => {
            let session = app.session().current();
            match format {
                Format::Json => print_json(&serde_json::json!({
                    "phase": session.phase().to_string(),
                    "user": session.user(),
                }))?,
                Format::Text => match session.user() {
                    Some(user) => print!("{}", render::user(user)),
                    None => println!("Not signed in"),
                },
            }
        }

        Commands::Open { path } => match app.open(&path).await {
            Some(route) => {
                if follow(&app, route, format).await? {
                    show_view(&app, route.view, format).await?;
                }
            }
            None => {
                print!("{}", render::not_found(&path));
                std::process::exit(1);
            }
        },

        Commands::Dashboard => {
            show_dashboard(&app, format).await?;
        }

        Commands::Chat { message, session } => {
            let reply = app
                .ask(&message, session.as_deref())
                .await
                .unwrap_or_else(|e| fail(e));
            emit(format, &reply, render::chat_reply)?;
        }

        Commands::ChatHistory { session } => {
            let messages = app.chat_history(&session).await.unwrap_or_else(|e| fail(e));
            emit(format, &messages, |m| render::chat_history(m))?;
        }

        Commands::ChatSessions => {
            let sessions = app.chat_sessions().await.unwrap_or_else(|e| fail(e));
            emit(format, &sessions, |s| render::chat_sessions(s))?;
        }

        Commands::Integrations => {
            let integrations = app.integrations().await.unwrap_or_else(|e| fail(e));
            emit(format, &integrations, |i| render::integrations(i))?;
        }

        Commands::IntegrationsToggle { id } => {
            let integration = app
                .toggle_integration(&id)
                .await
                .unwrap_or_else(|e| fail(e));
            emit(format, &integration, render::integration_toggled)?;
        }

        Commands::Settings => {
            let settings = app.settings().await.unwrap_or_else(|e| fail(e));
            emit(format, &settings, render::settings)?;
        }

        Commands::SettingsUpdate {
            name,
            email_notifications,
            report_schedule,
        } => {
            let update = SettingsUpdate {
                name,
                email_notifications,
                report_schedule,
            };
            let message = app
                .update_settings(&update)
                .await
                .unwrap_or_else(|e| fail(e));
            match format {
                Format::Json => print_json(&serde_json::json!({ "message": message }))?,
                Format::Text => println!("{}", message),
            }
        }

        // Handled before the session is restored
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Run the guard for `view`. Returns `false` when the command must not
/// proceed because the guard sent the user elsewhere.
async fn enter(app: &App, view: View, format: Format) -> anyhow::Result<bool> {
    let route = app.navigate(view).await;
    follow(app, route, format).await
}

async fn follow(app: &App, route: Route, format: Format) -> anyhow::Result<bool> {
    if !route.redirected() {
        return Ok(true);
    }

    match route.view {
        View::Login => {
            eprintln!("Please log in to open {}.", route.requested.title());
            eprintln!();
            eprintln!("  datalyn login --email <email> --password <password>");
            std::process::exit(1);
        }
        View::Dashboard => {
            if let Some(user) = app.user() {
                eprintln!("Already signed in as {}.", user.email);
            }
            show_dashboard(app, format).await?;
            Ok(false)
        }
        other => {
            tracing::warn!(from = %route.requested, to = %other, "Unexpected redirect");
            Ok(false)
        }
    }
}

/// Default content of a view reached by path
async fn show_view(app: &App, view: View, format: Format) -> anyhow::Result<()> {
    match view {
        View::Landing => {
            let user = app.user();
            print!("{}", render::landing(user.as_ref()));
            Ok(())
        }
        View::Login | View::Signup => {
            print!("{}", render::auth_form(view));
            Ok(())
        }
        View::Dashboard => show_dashboard(app, format).await,
        View::Chat => {
            let sessions = app.chat_sessions().await.unwrap_or_else(|e| fail(e));
            emit(format, &sessions, |s| render::chat_sessions(s))
        }
        View::Integrations => {
            let integrations = app.integrations().await.unwrap_or_else(|e| fail(e));
            emit(format, &integrations, |i| render::integrations(i))
        }
        View::Settings => {
            let settings = app.settings().await.unwrap_or_else(|e| fail(e));
            emit(format, &settings, render::settings)
        }
    }
}

async fn show_dashboard(app: &App, format: Format) -> anyhow::Result<()> {
    let metrics = app.dashboard().await.unwrap_or_else(|e| fail(e));
    emit(format, &metrics, render::dashboard)
}

fn emit<T: Serialize>(format: Format, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    match format {
        Format::Json => print_json(value),
        Format::Text => {
            print!("{}", text(value));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail(err: AppError) -> ! {
    eprintln!("{}", err);
    if err.is_unauthorized() {
        eprintln!("Your session is no longer valid. Log in again:");
        eprintln!("  datalyn login --email <email> --password <password>");
    }
    if let AppError::Page { source, .. } = &err {
        tracing::debug!("Cause: {}", source);
    }
    std::process::exit(1);
}
