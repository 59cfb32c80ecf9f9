use crate::cli::client::ApiClient;
use crate::cli::utils::{output_value, text};
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, body) = client.get_raw("/health").await?;
    output_value(&output_format, &body, |body| {
        println!("Status: {} ({})", text(body, "status"), status);
        println!("Store: {}", text(body, "store"));
    })?;

    if !status.is_success() {
        anyhow::bail!("server reported {}", status);
    }
    Ok(())
}
