pub mod commands;
pub mod render;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::config;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Contractor portal CLI - jobs, files, messages and quotes from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API base URL (defaults to PORTAL_API_URL)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the label and progress for a job stage")]
    Stage {
        #[arg(help = "Stage name, e.g. materials_ordered")]
        stage: String,
    },

    #[command(about = "Portal token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Client portal views")]
    Portal {
        #[command(subcommand)]
        cmd: commands::portal::PortalCommands,
    },

    #[command(about = "Job file attachments")]
    Files {
        #[command(subcommand)]
        cmd: commands::files::FilesCommands,
    },

    #[command(about = "Send a plain message to a contact")]
    Message {
        #[command(subcommand)]
        cmd: commands::message::MessageCommands,
    },

    #[command(about = "Send an email to a contact")]
    Email {
        #[command(subcommand)]
        cmd: commands::message::EmailCommands,
    },

    #[command(about = "Quote review, sending and approval")]
    Quote {
        #[command(subcommand)]
        cmd: commands::quote::QuoteCommands,
    },

    #[command(about = "Send a test email through the server")]
    TestEmail {
        #[arg(help = "Recipient address")]
        to: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn client(server: Option<&str>) -> anyhow::Result<ApiClient> {
    let mut client_config = config::config().client.clone();
    if let Some(url) = server {
        client_config.base_url = url.to_string();
    }
    Ok(ApiClient::from_config(&client_config)?)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.as_deref();

    match cli.command {
        Commands::Stage { stage } => commands::stage::handle(&stage, output_format),
        Commands::Token { cmd } => commands::token::handle(cmd, output_format),
        Commands::Portal { cmd } => commands::portal::handle(cmd, &client(server)?, output_format).await,
        Commands::Files { cmd } => commands::files::handle(cmd, &client(server)?, output_format).await,
        Commands::Message { cmd } => commands::message::handle_message(cmd, &client(server)?, output_format).await,
        Commands::Email { cmd } => commands::message::handle_email(cmd, &client(server)?, output_format).await,
        Commands::Quote { cmd } => commands::quote::handle(cmd, &client(server)?, output_format).await,
        Commands::TestEmail { to } => commands::email::handle(&to, &client(server)?, output_format).await,
    }
}
