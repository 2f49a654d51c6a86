//! Backend health command.

use kyarafit_client::PieceApi;
use kyarafit_core::AppError;

use super::Context;
use crate::output::{self, OutputFormat};

/// Execute the health command
pub async fn execute(ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let health = ctx.client.health().await?;

    if format == OutputFormat::Json {
        output::print_json(&health);
    } else if health.is_ok() {
        output::print_success(&format!(
            "{} is healthy",
            health.service.as_deref().unwrap_or("Backend")
        ));
        output::print_kv("URL", ctx.client.base_url().as_str());
    } else {
        output::print_warning(&format!("Backend reported status '{}'", health.status));
    }

    if !health.is_ok() {
        return Err(AppError::server(format!("Unhealthy backend: {}", health.status)));
    }
    Ok(())
}
