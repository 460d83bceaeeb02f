use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::quotes::QuoteFlow;

#[derive(Subcommand)]
pub enum QuoteCommands {
    #[command(about = "Show a quote with its line items")]
    Show {
        #[arg(help = "Quote ID")]
        id: Uuid,
    },

    #[command(about = "Send a draft quote to the client")]
    Send {
        #[arg(help = "Quote ID")]
        id: Uuid,
    },

    #[command(about = "Record the client's approval of a sent quote")]
    Approve {
        #[arg(help = "Quote ID")]
        id: Uuid,
        #[arg(long, help = "Name of the person approving")]
        signer: String,
    },
}

pub async fn handle(cmd: QuoteCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let flow = QuoteFlow::new(client.clone());

    match cmd {
        QuoteCommands::Show { id } => {
            let detail = flow.load(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&json!({
                    "quote": detail.quote,
                    "items": detail.items,
                    "total": detail.total()
                })),
                OutputFormat::Text => {
                    println!("{} [{}]", detail.quote.title, detail.quote.status.as_str());
                    for item in &detail.items {
                        println!(
                            "  {:<36} {:>6} x {:>10} = {:>10}",
                            item.description,
                            item.quantity,
                            item.unit_price,
                            item.total()
                        );
                    }
                    println!("  {:>70}", format!("Total {}", detail.total()));
                    Ok(())
                }
            }
        }
        QuoteCommands::Send { id } => {
            let quote = client.quote(id).await?;
            let sent = flow.send(&quote).await?;
            output_success(output_format, &format!("Sent {}", sent.title), Some(json!(sent)))
        }
        QuoteCommands::Approve { id, signer } => {
            let quote = client.quote(id).await?;
            let approval = flow.approve(&quote, &signer).await?;
            output_success(
                output_format,
                &format!("{} approved by {}", approval.quote.title, signer),
                Some(json!(approval)),
            )
        }
    }
}
