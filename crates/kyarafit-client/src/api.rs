//! The resource client contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use kyarafit_core::types::{AccessToken, Page, PieceId, QueryCriteria, SessionState};
use kyarafit_core::{AppError, AppResult};
use kyarafit_entity::{CreatePiece, Piece, UpdatePiece};

/// Backend liveness report from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when healthy.
    pub status: String,
    /// Reporting service name.
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    /// Whether the backend reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// One operation per REST verb on the pieces resource.
///
/// Implementations hold no client-side state that operations mutate; the
/// only shared thing is the connection pool.
#[async_trait]
pub trait PieceApi: Send + Sync + std::fmt::Debug + 'static {
    /// `GET /api/v1/pieces` with the criteria as query parameters.
    async fn list(&self, token: &AccessToken, criteria: &QueryCriteria) -> AppResult<Page<Piece>>;

    /// `GET /api/v1/pieces/{id}`.
    async fn get(&self, token: &AccessToken, id: &PieceId) -> AppResult<Piece>;

    /// `POST /api/v1/pieces`.
    async fn create(&self, token: &AccessToken, draft: &CreatePiece) -> AppResult<Piece>;

    /// `PUT /api/v1/pieces/{id}`.
    async fn update(
        &self,
        token: &AccessToken,
        id: &PieceId,
        patch: &UpdatePiece,
    ) -> AppResult<Piece>;

    /// `DELETE /api/v1/pieces/{id}`.
    async fn delete(&self, token: &AccessToken, id: &PieceId) -> AppResult<()>;

    /// `GET /api/v1/pieces/categories`, de-duplicated in server order.
    async fn list_categories(&self, token: &AccessToken) -> AppResult<Vec<String>>;

    /// `GET /health`. Needs no token.
    async fn health(&self) -> AppResult<HealthStatus>;
}

/// Borrow the session token or fail with `Unauthorized`.
pub fn require_token(session: &SessionState) -> AppResult<&AccessToken> {
    match session {
        SessionState::Present(token) => Ok(token),
        SessionState::Pending => Err(AppError::unauthorized(
            "Session is still loading; sign-in has not completed",
        )),
        SessionState::Absent => Err(AppError::unauthorized("You must be signed in")),
    }
}
