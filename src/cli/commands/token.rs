use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::issue_configured_token;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a portal link token for a contact's job")]
    Issue {
        #[arg(long, help = "Contact ID")]
        contact: Uuid,
        #[arg(long, help = "Job ID")]
        job: Uuid,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { contact, job } => {
            let token = issue_configured_token(contact, job)?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    "Portal token issued",
                    Some(json!({ "token": token, "contact_id": contact, "job_id": job })),
                ),
                // Bare token so it can be piped
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
