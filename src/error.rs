//! Error types for backend API calls.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by the backend client.
///
/// None of these are fatal: expiry forces a re-login, everything else is
/// recoverable through a user-initiated retry.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The backend rejected the stored identity; the caller must clear it
	/// and prompt re-authentication.
	#[error("Session expired. Please login again.")]
	SessionExpired,

	/// Non-success HTTP status, with whatever detail the backend supplied.
	#[error("request failed ({status}): {detail}")]
	Http { status: u16, detail: String },

	/// The request never produced a response (offline, DNS or CORS
	/// failure).
	#[error("network error: {0}")]
	Network(String),

	/// The response body did not match the expected shape.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
	/// Wraps a JS exception thrown by the Fetch API.
	pub(crate) fn from_js(value: JsValue) -> Self {
		let detail = value.as_string().unwrap_or_else(|| format!("{value:?}"));
		ApiError::Network(detail)
	}
}
