use clap::Subcommand;

use crate::cli::render;
use crate::cli::utils::output_json;
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::portal::{open_portal, PortalAccess, PortalGate, PortalPage};

#[derive(Subcommand)]
pub enum PortalCommands {
    #[command(about = "Open the portal page for a token")]
    View {
        #[arg(help = "Portal link token")]
        token: String,
    },

    #[command(about = "List every job of the token's contact")]
    Jobs {
        #[arg(help = "Portal link token")]
        token: String,
    },
}

pub async fn handle(cmd: PortalCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PortalCommands::View { token } => {
            let page = open_portal(client, &token).await;
            match output_format {
                OutputFormat::Json => output_json(&page)?,
                OutputFormat::Text => print!("{}", render::portal_page(&page)),
            }
            if let PortalPage::Denied { .. } = page {
                anyhow::bail!("portal access denied");
            }
            Ok(())
        }
        PortalCommands::Jobs { token } => {
            let session = match PortalGate::new(client.clone()).verify(&token).await {
                PortalAccess::Granted(session) => session,
                PortalAccess::Denied(reason) => anyhow::bail!("{}", reason.message()),
            };
            let (contact, jobs) = session.contact_jobs(client).await?;
            match output_format {
                OutputFormat::Json => output_json(&serde_json::json!({ "contact": contact, "jobs": jobs })),
                OutputFormat::Text => {
                    println!("Jobs for {}", contact.name);
                    for summary in &jobs {
                        println!("  {:<30} {:<20} {:>3}%", summary.job.title, summary.stage_label, summary.progress);
                    }
                    Ok(())
                }
            }
        }
    }
}
