use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::models::looks_like_email;

pub async fn handle(to: &str, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    if !looks_like_email(to) {
        anyhow::bail!("'{}' is not an email address", to);
    }
    let receipt = client.send_test_email(to).await?;
    output_success(output_format, &format!("Test email sent to {}", receipt.to), Some(json!(receipt)))
}
