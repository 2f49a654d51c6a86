//! Partial update payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use kyarafit_core::AppResult;

use super::rules;

/// A partial piece for `PUT /api/v1/pieces/{id}`. Unset fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdatePiece {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = rules::NAME_MAX),
        custom(function = "rules::not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = rules::DESCRIPTION_MAX))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = rules::CATEGORY_MAX))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "rules::tags"))]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub source_link: Option<String>,
    #[serde(
        default,
        with = "super::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "rules::price"))]
    pub price: Option<f64>,
}

impl UpdatePiece {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Run every field rule, mapping failures to a `Validation` error.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        Ok(())
    }
}
