//! Session configuration.

use serde::{Deserialize, Serialize};

/// Session settings.
///
/// Token issuance belongs to the external authentication service; the
/// client only carries a token it was handed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bearer token for the backend. Absent means no session.
    #[serde(default)]
    pub token: Option<String>,
}
