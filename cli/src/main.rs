//! Event Forms CLI
//!
//! Command-line client for the Event Forms API.
//!
//! # Usage
//!
//! ```bash
//! eventforms session login admin-42
//! eventforms forms create --event-name "Spring Mixer" --event-date 2026-04-02
//! eventforms forms add-field EVT-1 --name role --label "Role"
//! eventforms submit EVT-1 -f answers.yaml --connection "Globex|Referral / introduced"
//! eventforms responses export EVT-1
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use event_forms::FieldType;

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "eventforms")]
#[command(version)]
#[command(about = "Event Forms Command Line Interface", long_about = None)]
struct Cli {
    /// API base URL (including the `/api` prefix)
    #[arg(long, env = "EVENTFORMS_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Admin session
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Manage forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Fill in and submit a form
    Submit(SubmitArgs),
    /// Preview or download responses
    Responses {
        #[command(subcommand)]
        action: ResponseCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Act as the given admin until logout
    Login { admin_id: String },
    /// Forget the current admin
    Logout,
    /// Show the current admin
    Whoami,
}

#[derive(Subcommand)]
enum FormCommands {
    /// List forms
    List {
        /// Only forms owned by the logged-in admin
        #[arg(long)]
        mine: bool,
        /// Keep forms whose title, event name or ID contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a form and its fields
    Get { id: String },
    /// Create a form owned by the logged-in admin
    Create {
        #[arg(long)]
        event_name: String,
        /// Date of the event (YYYY-MM-DD)
        #[arg(long)]
        event_date: chrono::NaiveDate,
        /// Event ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Extra field as `name:label`
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Delete a form and all of its responses
    Delete { id: String },
    /// Append an extra field
    AddField {
        form_id: String,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Replace the extra field at `index`
    UpdateField {
        form_id: String,
        index: usize,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Remove the extra field at `index`
    RemoveField { form_id: String, index: usize },
}

#[derive(clap::Args)]
struct FieldArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    label: String,
    #[arg(long = "type", default_value = "text")]
    field_type: FieldType,
    /// Let participants leave the field blank
    #[arg(long)]
    optional: bool,
}

#[derive(clap::Args)]
struct SubmitArgs {
    form_id: String,
    /// Answers file (JSON, or YAML by extension) with `values` and `connections`
    #[arg(long, short = 'f')]
    file: Option<std::path::PathBuf>,
    /// Answer as `field=value`, applied after the file
    #[arg(long = "value")]
    values: Vec<String>,
    /// Connection as `organization|type[|other]`
    #[arg(long = "connection")]
    connections: Vec<String>,
}

#[derive(Subcommand)]
enum ResponseCommands {
    /// Preview stored responses, newest first
    List { form_id: String },
    /// Download responses as CSV
    Export {
        form_id: String,
        /// Destination file (defaults to `<form_id>_responses.csv`)
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::Config::load(cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Warning:".yellow(), e);
            config::Config::default()
        }
    };
    let format = cli.format.or_else(|| config.default_format()).unwrap_or(output::OutputFormat::Table);
    let api_url = cli.api_url.clone().or_else(|| config.api_url.clone()).unwrap_or_else(|| config::DEFAULT_API_URL.into());
    let session = config.session();

    let client = commands::ApiClient::new(&api_url);

    let result = match cli.command {
        Commands::Session { action } => commands::session::handle(action, config, cli.profile.as_deref()),
        Commands::Forms { action } => commands::forms::handle(action, &client, &session, format).await,
        Commands::Submit(args) => commands::submit::handle(args, &client).await,
        Commands::Responses { action } => commands::responses::handle(action, &client, format).await,
    };

    if let Err(e) = result {
        output::error_banner(&e);
        std::process::exit(1);
    }
}
