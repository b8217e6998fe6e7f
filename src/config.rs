//! Build-time configuration.
//!
//! The backend host and the OAuth client id are baked in at compile time,
//! the WASM analogue of build-time public environment variables.

/// Application configuration resolved from the build environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
	/// Base URL of the backend API, without a trailing slash.
	pub api_url: &'static str,
	/// Google OAuth client id identifying this application to the identity
	/// provider.
	pub google_client_id: &'static str,
}

const DEFAULT_API_URL: &str = "http://localhost:8000";

impl Config {
	/// Reads `API_URL` and `GOOGLE_CLIENT_ID`, defaulting to a local
	/// backend and an unset client id for development builds.
	pub fn from_build_env() -> Self {
		Self {
			api_url: option_env!("API_URL").unwrap_or(DEFAULT_API_URL),
			google_client_id: option_env!("GOOGLE_CLIENT_ID").unwrap_or(""),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_url_has_no_trailing_slash() {
		let config = Config::from_build_env();
		assert!(!config.api_url.is_empty());
		assert!(!config.api_url.ends_with('/'));
	}
}
