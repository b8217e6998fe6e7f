//! Login screen and OAuth redirect plumbing.
//!
//! The authorization-code flow itself happens elsewhere: this component
//! only sends the browser to the Google authorization endpoint and, on the
//! way back, pulls the returned code out of the URL for the backend
//! exchange.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::config::Config;

/// Google OAuth authorization endpoint.
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Scopes requested at login. `gmail.readonly` is what the backend needs
/// to walk the mailbox.
const SCOPES: &str = "openid https://www.googleapis.com/auth/userinfo.profile https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/gmail.readonly";

/// Builds the authorization URL for the code flow.
fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
	format!(
		"{AUTH_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
		urlencoding::encode(client_id),
		urlencoding::encode(redirect_uri),
		urlencoding::encode(SCOPES),
	)
}

/// Pulls an OAuth `code` out of the current URL, stripping the query from
/// the address bar so a reload doesn't resend a consumed code.
pub fn take_auth_code() -> Option<String> {
	let window = web_sys::window()?;
	let location = window.location();
	let search = location.search().ok()?;
	if search.is_empty() {
		return None;
	}
	let params = web_sys::UrlSearchParams::new_with_str(search.trim_start_matches('?')).ok()?;
	let code = params.get("code")?;

	if let (Ok(path), Ok(history)) = (location.pathname(), window.history()) {
		let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
	}
	Some(code)
}

/// Landing view shown while no session exists.
#[component]
pub fn LoginScreen(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
	let config = Config::from_build_env();

	let on_login = move |_| {
		let Some(window) = web_sys::window() else {
			return;
		};
		let origin = window.location().origin().unwrap_or_default();
		let _ = window
			.location()
			.assign(&authorize_url(config.google_client_id, &origin));
	};

	view! {
		<div class="login-screen">
			<div class="login-card">
				<h1>"Beyond Meet"</h1>
				<p class="login-subtitle">
					"Visualize your professional network through email interactions"
				</p>
				<ul class="login-features">
					<li>"Analyze email interactions"</li>
					<li>"Discover hidden connections"</li>
					<li>"Interactive network visualization"</li>
				</ul>
				<button class="login-button" on:click=on_login>
					"Sign in with Google"
				</button>
				{move || {
					error
						.get()
						.map(|message| view! { <div class="login-error">{message}</div> })
				}}
				<div class="login-footnote">
					<p>"By signing in, you agree to our Privacy Policy and Terms of Service"</p>
				</div>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn authorize_url_encodes_its_parameters() {
		let url = authorize_url("client-123", "http://localhost:3000");
		assert!(url.starts_with(AUTH_ENDPOINT));
		assert!(url.contains("client_id=client-123"));
		assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000"));
		assert!(url.contains("response_type=code"));
		assert!(url.contains("gmail.readonly"));
		// The raw scope separator must not survive encoding.
		assert!(!url.contains("scope=openid "));
	}
}
