//! Piece category vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The categories the clients offer.
///
/// Categories are open-ended on the wire; a [`Piece`](super::Piece) keeps
/// whatever string the backend holds. This enum covers the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceCategory {
    /// Wigs and hairpieces.
    Wig,
    /// Dresses and main garments.
    Dress,
    /// Handheld props and weapons.
    Prop,
    /// Footwear.
    Shoes,
    /// Jewellery, bags, and small accessories.
    Accessory,
    /// Cosmetics and contacts.
    Makeup,
    /// Anything else.
    Other,
}

impl PieceCategory {
    /// All known categories in display order.
    pub const ALL: [PieceCategory; 7] = [
        Self::Wig,
        Self::Dress,
        Self::Prop,
        Self::Shoes,
        Self::Accessory,
        Self::Makeup,
        Self::Other,
    ];

    /// Return the category as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wig => "wig",
            Self::Dress => "dress",
            Self::Prop => "prop",
            Self::Shoes => "shoes",
            Self::Accessory => "accessory",
            Self::Makeup => "makeup",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wig => "Wig",
            Self::Dress => "Dress",
            Self::Prop => "Prop",
            Self::Shoes => "Shoes",
            Self::Accessory => "Accessory",
            Self::Makeup => "Makeup",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PieceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PieceCategory {
    type Err = kyarafit_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                kyarafit_core::AppError::validation(format!(
                    "Invalid category: '{s}'. Expected one of: wig, dress, prop, shoes, accessory, makeup, other"
                ))
            })
    }
}
