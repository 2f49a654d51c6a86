//! Category listing command.

use serde::Serialize;
use tabled::Tabled;

use kyarafit_client::PieceApi;
use kyarafit_core::AppError;
use kyarafit_entity::PieceCategory;

use super::Context;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct CategoryRow {
    /// Category tag
    category: String,
    /// Known label, if any
    label: String,
}

/// Execute the categories command
pub async fn execute(ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let categories = ctx.client.list_categories(&ctx.token()?).await?;

    match format {
        OutputFormat::Json => output::print_json(&categories),
        OutputFormat::Table => {
            let rows: Vec<CategoryRow> = categories
                .into_iter()
                .map(|c| CategoryRow {
                    label: c
                        .parse::<PieceCategory>()
                        .map_or_else(|_| "-".to_string(), |k| k.label().to_string()),
                    category: c,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
