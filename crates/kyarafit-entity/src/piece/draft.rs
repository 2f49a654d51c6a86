//! Create-piece draft.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use kyarafit_core::AppResult;

use super::rules;

/// An unsaved piece: everything but the server-assigned fields.
///
/// This is also the `POST /api/v1/pieces` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreatePiece {
    /// Display name. Required and non-blank at submission.
    #[validate(
        length(min = 1, max = rules::NAME_MAX),
        custom(function = "rules::not_blank")
    )]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = rules::DESCRIPTION_MAX))]
    pub description: Option<String>,
    /// Full-size image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    /// Thumbnail image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    /// Category tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = rules::CATEGORY_MAX))]
    pub category: Option<String>,
    /// Unique tags in entry order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "rules::tags"))]
    pub tags: Vec<String>,
    /// Where the piece was bought or referenced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub source_link: Option<String>,
    /// Date of purchase, sent as `YYYY-MM-DD`.
    #[serde(
        default,
        with = "super::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<NaiveDate>,
    /// Purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "rules::price"))]
    pub price: Option<f64>,
}

impl CreatePiece {
    /// Start a draft with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a tag. Blank tags and exact duplicates are ignored.
    ///
    /// Returns `true` if the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove every tag equal to `tag`. Returns how many were removed.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before - self.tags.len()
    }

    /// Whether the name is present and non-blank.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Run every field rule, mapping failures to a `Validation` error.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        Ok(())
    }
}
