//! Translation of transport and HTTP failures into [`AppError`].

use reqwest::StatusCode;

use kyarafit_core::AppError;
use kyarafit_core::error::ErrorKind;

use crate::wire::ErrorBody;

/// Map a non-success status and its body to an error kind and message.
pub fn translate_status(status: StatusCode, body: &str) -> AppError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

    let kind = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        _ => ErrorKind::Server,
    };

    AppError::new(kind, format!("{detail} (HTTP {})", status.as_u16()))
}

/// Map a `reqwest` failure: timeouts and connection problems are
/// `Network`, undecodable bodies are `Serialization`.
pub fn translate_transport(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        return AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed response body: {err}"),
            err,
        );
    }
    let message = if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Could not connect to the backend".to_string()
    } else {
        format!("Request failed: {err}")
    };
    AppError::with_source(ErrorKind::Network, message, err)
}
