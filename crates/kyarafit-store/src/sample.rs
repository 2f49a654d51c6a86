//! Placeholder pieces for development when the backend is unreachable.
//!
//! Only shown when `store.fallback = "sample_data"`; the fetch failure
//! stays visible in the status either way.

use chrono::{DateTime, NaiveDate, Utc};

use kyarafit_core::types::{PieceId, QueryCriteria};
use kyarafit_entity::Piece;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|n| n.and_utc())
        .unwrap_or_default()
}

fn sample(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    tags: &[&str],
    price: f64,
    created_at: DateTime<Utc>,
) -> Piece {
    Piece {
        id: PieceId::new(id),
        user_id: None,
        name: name.to_string(),
        description: Some(description.to_string()),
        image_url: None,
        thumbnail_url: None,
        category: Some(category.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        source_link: None,
        purchase_date: None,
        price: Some(price),
        created_at,
        updated_at: created_at,
    }
}

/// The fixed placeholder set, newest first.
pub fn sample_pieces() -> Vec<Piece> {
    vec![
        sample(
            "sample-1",
            "Pink Anime Wig",
            "Beautiful long pink wig for anime cosplay",
            "wig",
            &["anime", "pink", "long"],
            45.99,
            at(2024, 1, 15, 10, 30),
        ),
        sample(
            "sample-2",
            "School Uniform Dress",
            "Classic Japanese school uniform",
            "dress",
            &["school", "uniform", "blue"],
            89.99,
            at(2024, 1, 14, 15, 20),
        ),
        sample(
            "sample-3",
            "Magic Wand Prop",
            "Sparkly magic wand for magical girl cosplay",
            "prop",
            &["magic", "sparkly", "wand"],
            25.50,
            at(2024, 1, 13, 9, 15),
        ),
    ]
}

/// Placeholder pieces narrowed to `criteria`.
pub fn sample_matching(criteria: &QueryCriteria) -> Vec<Piece> {
    sample_pieces()
        .into_iter()
        .filter(|p| p.matches(criteria))
        .take(criteria.limit as usize)
        .collect()
}
