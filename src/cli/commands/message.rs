use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::composer::{ComposerMode, MessageComposer, SubmitOutcome};

#[derive(Subcommand)]
pub enum MessageCommands {
    #[command(about = "Send a plain message")]
    Send {
        #[arg(help = "Contact ID")]
        contact: Uuid,
        #[arg(help = "Message text")]
        body: String,
    },
}

#[derive(Subcommand)]
pub enum EmailCommands {
    #[command(about = "Send an email to the contact's address on file")]
    Send {
        #[arg(help = "Contact ID")]
        contact: Uuid,
        #[arg(long, help = "Email subject")]
        subject: String,
        #[arg(long, help = "Email body")]
        body: String,
    },
}

async fn compose(
    client: &ApiClient,
    contact_id: Uuid,
    mode: ComposerMode,
    subject: Option<String>,
    body: String,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let contact = client.contact(contact_id).await?;
    let mut composer = MessageComposer::new(client.clone(), contact);
    composer.open(mode);
    if let Some(subject) = subject {
        composer.set_subject(subject);
    }
    composer.set_body(body);

    match composer.submit().await? {
        SubmitOutcome::Sent(message) => {
            let what = match mode {
                ComposerMode::Message => "Message",
                ComposerMode::Email => "Email",
            };
            output_success(
                output_format,
                &format!("{} sent to {}", what, composer.contact().name),
                Some(json!(message)),
            )
        }
        SubmitOutcome::Skipped => output_success(output_format, "Nothing to send", None),
    }
}

pub async fn handle_message(cmd: MessageCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MessageCommands::Send { contact, body } => {
            compose(client, contact, ComposerMode::Message, None, body, output_format).await
        }
    }
}

pub async fn handle_email(cmd: EmailCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        EmailCommands::Send { contact, subject, body } => {
            compose(client, contact, ComposerMode::Email, Some(subject), body, output_format).await
        }
    }
}
