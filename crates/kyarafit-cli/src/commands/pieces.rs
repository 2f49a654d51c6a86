//! Wardrobe piece CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use kyarafit_client::PieceApi;
use kyarafit_core::AppError;
use kyarafit_core::types::{PieceId, QueryCriteria};
use kyarafit_entity::piece::{date, rules};
use kyarafit_entity::{Piece, UpdatePiece};
use kyarafit_store::CreateForm;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for piece commands
#[derive(Debug, Args)]
pub struct PiecesArgs {
    /// Piece subcommand
    #[command(subcommand)]
    pub command: PieceCommand,
}

/// Piece subcommands
#[derive(Debug, Subcommand)]
pub enum PieceCommand {
    /// List pieces, optionally filtered
    List {
        /// Free-text search over name, description, category, and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Category filter (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,
        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
        /// Items to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one piece
    Get {
        /// Piece ID
        id: String,
    },
    /// Add a piece (prompts for the name if omitted)
    Add(PieceFields),
    /// Update fields of a piece
    Update {
        /// Piece ID
        id: String,
        #[command(flatten)]
        fields: PieceFields,
    },
    /// Delete a piece
    Delete {
        /// Piece ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Editable piece fields
#[derive(Debug, Args)]
pub struct PieceFields {
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Category (wig, dress, prop, shoes, accessory, makeup, other)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Tag, repeatable
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Price, e.g. 25.50
    #[arg(short, long)]
    pub price: Option<String>,
    /// Purchase date, YYYY-MM-DD
    #[arg(long)]
    pub purchase_date: Option<String>,
    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
    /// Thumbnail URL
    #[arg(long)]
    pub thumbnail_url: Option<String>,
    /// Where the piece came from
    #[arg(long)]
    pub source_link: Option<String>,
}

/// Piece display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PieceRow {
    /// Piece ID
    id: String,
    /// Name
    name: String,
    /// Category
    category: String,
    /// Tags
    tags: String,
    /// Price
    price: String,
    /// Created at
    created_at: String,
}

impl From<&Piece> for PieceRow {
    fn from(p: &Piece) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: output::or_dash(p.category.as_deref()),
            tags: p.tags.join(", "),
            price: p.price.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
            created_at: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute piece commands
pub async fn execute(
    args: &PiecesArgs,
    ctx: &Context,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PieceCommand::List {
            search,
            category,
            limit,
            offset,
        } => {
            let criteria = QueryCriteria::with_limit(limit.unwrap_or(ctx.config.store.page_size))
                .search(search.as_deref().unwrap_or_default())
                .category(category.as_deref())
                .at_offset(*offset);
            let page = ctx.client.list(&ctx.token()?, &criteria).await?;

            match format {
                OutputFormat::Json => output::print_json(&page),
                OutputFormat::Table => {
                    let rows: Vec<PieceRow> = page.items.iter().map(PieceRow::from).collect();
                    output::print_list(&rows, format);
                    if !rows.is_empty() {
                        println!(
                            "Showing {}-{} of {}",
                            page.offset + 1,
                            page.offset as usize + rows.len(),
                            page.total
                        );
                    }
                }
            }
        }
        PieceCommand::Get { id } => {
            let piece = ctx.client.get(&ctx.token()?, &PieceId::new(id.as_str())).await?;
            print_piece(&piece, format);
        }
        PieceCommand::Add(fields) => {
            let api: Arc<dyn PieceApi> = ctx.client.clone();
            let mut form = CreateForm::new(api, ctx.session.clone());

            let name = match &fields.name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Piece name")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            form.set_name(name);
            if let Some(d) = &fields.description {
                form.set_description(d);
            }
            if let Some(c) = &fields.category {
                form.set_category(c);
            }
            for tag in &fields.tags {
                form.add_tag(tag);
            }
            if let Some(p) = &fields.price {
                form.set_price(p);
                if form.draft().price.is_none() {
                    output::print_warning(&format!("Ignoring unparseable price '{p}'"));
                }
            }
            if let Some(d) = &fields.purchase_date {
                form.set_purchase_date(d)?;
            }
            if let Some(u) = &fields.image_url {
                form.set_image_url(u);
            }
            if let Some(u) = &fields.thumbnail_url {
                form.set_thumbnail_url(u);
            }
            if let Some(u) = &fields.source_link {
                form.set_source_link(u);
            }

            let piece = form.submit().await?;
            output::print_success(&format!("Piece '{}' created ({})", piece.name, piece.id));
            if format == OutputFormat::Json {
                output::print_json(&piece);
            }
        }
        PieceCommand::Update { id, fields } => {
            let patch = patch_from(fields)?;
            if patch.is_empty() {
                return Err(AppError::validation("Nothing to update"));
            }
            patch.check()?;

            let piece = ctx
                .client
                .update(&ctx.token()?, &PieceId::new(id.as_str()), &patch)
                .await?;
            output::print_success(&format!("Piece '{}' updated", piece.name));
            print_piece(&piece, format);
        }
        PieceCommand::Delete { id, yes } => {
            let token = ctx.token()?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete piece '{id}'? This cannot be undone"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    output::print_warning("Delete cancelled");
                    return Ok(());
                }
            }

            ctx.client.delete(&token, &PieceId::new(id.as_str())).await?;
            output::print_success(&format!("Piece '{id}' deleted"));
        }
    }

    Ok(())
}

fn patch_from(fields: &PieceFields) -> Result<UpdatePiece, AppError> {
    let price = match fields.price.as_deref() {
        Some(text) => Some(
            rules::parse_price(text)
                .ok_or_else(|| AppError::validation(format!("Invalid price '{text}'")))?,
        ),
        None => None,
    };
    let purchase_date = match fields.purchase_date.as_deref() {
        Some(text) => Some(date::parse(text).ok_or_else(|| {
            AppError::validation(format!("Invalid purchase date '{text}', expected YYYY-MM-DD"))
        })?),
        None => None,
    };

    Ok(UpdatePiece {
        name: fields.name.as_deref().map(|n| n.trim().to_string()),
        description: fields.description.clone(),
        image_url: fields.image_url.clone(),
        thumbnail_url: fields.thumbnail_url.clone(),
        category: fields.category.as_deref().map(|c| c.trim().to_lowercase()),
        tags: (!fields.tags.is_empty()).then(|| fields.tags.clone()),
        source_link: fields.source_link.clone(),
        purchase_date,
        price,
    })
}

fn print_piece(piece: &Piece, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_json(piece);
        return;
    }
    output::print_kv("ID", piece.id.as_str());
    output::print_kv("Name", &piece.name);
    output::print_kv("Category", &output::or_dash(piece.category.as_deref()));
    output::print_kv("Description", &output::or_dash(piece.description.as_deref()));
    output::print_kv("Tags", &piece.tags.join(", "));
    output::print_kv(
        "Price",
        &piece.price.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
    );
    output::print_kv(
        "Purchased",
        &piece
            .purchase_date
            .map_or_else(|| "-".to_string(), |d| d.format(date::DATE_FORMAT).to_string()),
    );
    output::print_kv("Source", &output::or_dash(piece.source_link.as_deref()));
    output::print_kv("Image", &output::or_dash(piece.image_url.as_deref()));
    output::print_kv("Created", &piece.created_at.to_rfc3339());
    output::print_kv("Updated", &piece.updated_at.to_rfc3339());
}
