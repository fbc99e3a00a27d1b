//! Agentica CLI
//!
//! Command-line interface for the Agentica document-chat service:
//! - Register, log in and out
//! - Show the dashboard and manage uploaded files
//! - Chat over your documents, or as a guest over public ones
//! - Generate a config file

use agentica::api::{ApiClient, Backend, FileUpload};
use agentica::config::{generate_default_config, Config, LoggingConfig};
use agentica::model::{FileRecord, Visibility};
use agentica::routes::{self, Route, RouteAccess};
use agentica::screens::{AuthScreen, ChatScreen, DashboardScreen};
use agentica::session::SessionStore;
use agentica::storage::FileStore;
use agentica::{ClientError, GuestVisibility, GuestWidget};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agentica")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with your documents")]
#[command(long_about = "Agentica client.\nUpload documents, let the backend index them, and ask questions about them.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (overrides config and AGENTICA_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log in
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Profile, stats and files
    Dashboard,

    /// Manage uploaded files
    Files {
        #[command(subcommand)]
        action: FileCommand,
    },

    /// Chat over your private documents (no message: interactive)
    Chat {
        message: Option<String>,
        /// Print the stored conversation first
        #[arg(long)]
        history: bool,
    },

    /// Chat over public documents without an account
    Guest { message: Option<String> },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum FileCommand {
    /// List uploaded files
    List,
    /// Upload a document
    Upload {
        path: PathBuf,
        /// private or public
        #[arg(short, long, default_value = "private")]
        visibility: Visibility,
    },
    /// Index a file so chat can use it
    Process { id: i64 },
    /// Delete a file
    Delete { id: i64 },
}

struct App {
    session: Arc<SessionStore>,
    backend: Arc<dyn Backend>,
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, skipped) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Vec::new()),
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging)?;

    for e in &skipped {
        tracing::warn!("Skipped config file: {}", e);
    }

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let store_path = config.session.resolved_path();
    tracing::debug!("Session file: {:?}", store_path);

    let session = Arc::new(SessionStore::new(FileStore::new(store_path)));
    session.hydrate();

    let client = ApiClient::from_config(&config.api, Arc::clone(&session))?;
    tracing::debug!(base_url = client.base_url(), "Backend");

    let app = App {
        session,
        backend: Arc::new(client),
        format: cli.format,
    };

    match run(&app, cli.command).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<ClientError>() {
            Some(ClientError::Unauthorized) => {
                bail!(
                    "Session expired. Run `{}` to continue.",
                    command_for(Route::Login)
                )
            }
            Some(ClientError::Network(msg)) => {
                bail!(
                    "Cannot reach the Agentica API at {}: {}",
                    config.api.base_url,
                    msg
                )
            }
            _ => Err(e),
        },
    }
}

fn write_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("agentica={}", config.level).into());

    let writer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };
    let ansi = config.file.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(ansi).with_writer(writer))
            .init();
    }
    Ok(())
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            guest_only(app, Route::Register)?;
            let screen = AuthScreen::new(Arc::clone(&app.backend), Arc::clone(&app.session));
            let next = screen.register(&username, &email, &password).await?;
            println!("Account created. Logged in as {}.", username);
            println!("Next: {}", command_for(next));
        }

        Commands::Login { username, password } => {
            guest_only(app, Route::Login)?;
            let screen = AuthScreen::new(Arc::clone(&app.backend), Arc::clone(&app.session));
            let next = screen.login(&username, &password).await?;
            println!("Logged in as {}.", username);
            println!("Next: {}", command_for(next));
        }

        Commands::Logout => {
            let was = app.session.user();
            app.session.logout();
            match was {
                Some(user) => println!("Logged out {}.", user.username),
                None => println!("Not logged in."),
            }
        }

        Commands::Whoami => match app.session.user() {
            Some(user) if app.format == OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            Some(user) => {
                println!("Username: {}", user.username);
                if let Some(email) = &user.email {
                    println!("Email:    {}", email);
                }
            }
            None => {
                println!("Not logged in.");
                println!("Run `{}` or `{}`.", command_for(Route::Login), command_for(Route::Register));
            }
        },

        Commands::Dashboard => {
            require_session(app, Route::Dashboard)?;
            let screen = DashboardScreen::new(Arc::clone(&app.backend));
            screen.load().await?;
            let dash = screen.snapshot();

            if app.format == OutputFormat::Json {
                let body = serde_json::json!({
                    "profile": dash.profile(),
                    "profile_completeness": dash.completeness(),
                    "total_files": dash.total_files(),
                    "processed_files": dash.processed_files(),
                    "files": dash.files(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }

            match (dash.profile(), dash.load_error()) {
                (Some(user), _) => {
                    println!("{}", user.username);
                    if let Some(profile) = &user.profile {
                        println!("  Address: {}", profile.address().unwrap_or("-"));
                        println!("  Phone:   {}", profile.phone().unwrap_or("-"));
                    }
                }
                (None, Some(err)) => eprintln!("Profile unavailable: {}", err),
                (None, None) => {}
            }
            println!("  Profile completeness: {}%", dash.completeness());
            println!();
            println!(
                "Files: {} total, {} processed",
                dash.total_files(),
                dash.processed_files()
            );
            if let Some(err) = dash.files_error() {
                eprintln!("{}", err);
            }
            println!();
            print_files(dash.files());
        }

        Commands::Files { action } => {
            require_session(app, Route::Dashboard)?;
            run_files(app, action).await?;
        }

        Commands::Chat { message, history } => {
            require_session(app, Route::Chat)?;
            let screen = ChatScreen::private(Arc::clone(&app.backend));

            match screen.load_history().await {
                Ok(()) => {}
                Err(ClientError::Unauthorized) => return Err(ClientError::Unauthorized.into()),
                Err(_) => {
                    if let Some(err) = screen.history_error() {
                        eprintln!("{}", err);
                    }
                }
            }

            if history || message.is_none() {
                for m in screen.messages() {
                    print_message(&m);
                }
            }

            match message {
                Some(text) => {
                    let reply = screen.send(&text).await?;
                    println!("{}", reply.text);
                }
                None => chat_loop(&screen).await?,
            }
        }

        Commands::Guest { message } => {
            let widget = GuestWidget::new();
            if widget.visibility(&app.session) == GuestVisibility::Hidden {
                bail!(
                    "Guest chat is for visitors. You are logged in; use `{}`.",
                    command_for(Route::Chat)
                );
            }

            let screen = ChatScreen::guest(Arc::clone(&app.backend));
            match message {
                Some(text) => {
                    let reply = screen.send(&text).await?;
                    println!("{}", reply.text);
                }
                None => {
                    for m in screen.messages() {
                        print_message(&m);
                    }
                    chat_loop(&screen).await?;
                }
            }
        }

        Commands::Config { output } => write_config(output.as_deref())?,
    }

    Ok(())
}

async fn run_files(app: &App, action: FileCommand) -> anyhow::Result<()> {
    let screen = DashboardScreen::new(Arc::clone(&app.backend));

    match action {
        FileCommand::List => {
            let files = app.backend.list_files().await?;
            if app.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                print_files(&files);
            }
        }

        FileCommand::Upload { path, visibility } => {
            let upload = FileUpload::from_path(&path, visibility)?;
            let record = screen.upload(upload).await?;
            if app.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!(
                    "Uploaded {} as {} (id {}, {})",
                    record.filename, record.information_type, record.id, record.status
                );
                println!("Next: agentica files process {}", record.id);
            }
        }

        FileCommand::Process { id } => {
            let status = screen.process(id).await?;
            println!("File {}: {}", id, status);
        }

        FileCommand::Delete { id } => {
            screen.delete(id).await?;
            println!("Deleted file {}", id);
        }
    }

    Ok(())
}

/// Refuse commands whose screen needs a session
fn require_session(app: &App, route: Route) -> anyhow::Result<()> {
    match routes::access(route, &app.session) {
        RouteAccess::Render => Ok(()),
        RouteAccess::Redirect(to) => bail!("Not logged in. Run `{}` first.", command_for(to)),
        RouteAccess::Loading => bail!("Session not restored"),
    }
}

/// Refuse login/register while a session is active
fn guest_only(app: &App, route: Route) -> anyhow::Result<()> {
    match routes::access(route, &app.session) {
        RouteAccess::Redirect(to) => {
            let name = app.session.user().map(|u| u.username).unwrap_or_default();
            bail!(
                "Already logged in as {}. Run `agentica logout` first, or `{}`.",
                name,
                command_for(to)
            )
        }
        _ => Ok(()),
    }
}

/// The command that shows a given screen
fn command_for(route: Route) -> &'static str {
    match route {
        Route::Home | Route::Dashboard => "agentica dashboard",
        Route::Login => "agentica login",
        Route::Register => "agentica register",
        Route::Chat => "agentica chat",
    }
}

async fn chat_loop(screen: &ChatScreen) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }

        let reply = screen.send(text).await?;
        println!("{}", reply.text);
    }

    Ok(())
}

fn print_message(message: &agentica::ChatMessage) {
    let who = match message.role {
        agentica::Role::User => "you",
        agentica::Role::Assistant => "agentica",
    };
    println!(
        "[{}] {}: {}",
        message.timestamp.format("%Y-%m-%d %H:%M"),
        who,
        message.text
    );
}

fn print_files(files: &[FileRecord]) {
    if files.is_empty() {
        println!("No files uploaded yet.");
        println!();
        println!("Upload your first document with:");
        println!("  agentica files upload ./notes.pdf --visibility private");
        return;
    }

    println!(
        "{:<6} {:<32} {:<10} {:<20} {}",
        "ID", "Filename", "Visibility", "Status", "Uploaded"
    );
    println!("{}", "-".repeat(86));

    for file in files {
        println!(
            "{:<6} {:<32} {:<10} {:<20} {}",
            file.id,
            truncate(&file.filename, 32),
            file.information_type,
            file.status,
            file.uploaded_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
