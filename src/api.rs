//! Backend API client over the browser Fetch API.
//!
//! Every graph endpoint is keyed by the session's user id as a query
//! parameter; a 401 from any of them means the stored identity is stale
//! and maps to [`ApiError::SessionExpired`].

use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::graph::{ContactNode, GraphData};
use crate::session::UserInfo;

fn request(url: &str, method: &str, body: Option<&str>) -> ApiResult<Request> {
	let init = RequestInit::new();
	init.set_method(method);
	init.set_credentials(RequestCredentials::Include);
	if let Some(body) = body {
		init.set_body(&JsValue::from_str(body));
	}

	let request = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
	if body.is_some() {
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(ApiError::from_js)?;
	}
	Ok(request)
}

async fn send(request: Request) -> ApiResult<Response> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(ApiError::from_js)?;
	response.dyn_into::<Response>().map_err(ApiError::from_js)
}

async fn body_text(response: &Response) -> ApiResult<String> {
	let text = JsFuture::from(response.text().map_err(ApiError::from_js)?)
		.await
		.map_err(ApiError::from_js)?;
	Ok(text.as_string().unwrap_or_default())
}

/// Error payload the backend attaches to non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
	detail: String,
}

async fn check_status(response: Response) -> ApiResult<Response> {
	let status = response.status();
	if status == 401 {
		return Err(ApiError::SessionExpired);
	}
	if !response.ok() {
		let mut detail = match body_text(&response).await {
			Ok(text) => serde_json::from_str::<ErrorBody>(&text)
				.map(|body| body.detail)
				.unwrap_or(text),
			Err(_) => String::new(),
		};
		if detail.is_empty() {
			detail = response.status_text();
		}
		return Err(ApiError::Http { status, detail });
	}
	Ok(response)
}

/// Fetches the current graph snapshot, replacing any prior graph wholesale.
pub async fn fetch_graph(config: &Config, user_id: &str) -> ApiResult<GraphData> {
	let url = format!("{}/api/graph?user_id={user_id}", config.api_url);
	let response = check_status(send(request(&url, "GET", None)?).await?).await?;
	let text = body_text(&response).await?;
	Ok(serde_json::from_str(&text)?)
}

/// Asks the backend to start generating a fresh graph. Progress arrives on
/// the separate push stream.
pub async fn start_generation(config: &Config, user_id: &str) -> ApiResult<()> {
	let url = format!("{}/api/graph?user_id={user_id}", config.api_url);
	check_status(send(request(&url, "POST", None)?).await?).await?;
	Ok(())
}

/// Persists edits to a contact with a full node body.
pub async fn update_node(config: &Config, user_id: &str, node: &ContactNode) -> ApiResult<()> {
	let url = format!(
		"{}/api/graph/node/{}?user_id={user_id}",
		config.api_url, node.id
	);
	let body = serde_json::to_string(node)?;
	check_status(send(request(&url, "PUT", Some(&body))?).await?).await?;
	Ok(())
}

/// Identity fields returned by the auth-code exchange.
#[derive(Default, Deserialize)]
#[serde(default)]
struct AuthExchange {
	user_id: String,
	email: String,
	name: String,
	picture: String,
}

/// Exchanges an OAuth authorization code for a session identity.
pub async fn exchange_auth_code(
	config: &Config,
	code: &str,
	redirect_uri: &str,
) -> ApiResult<UserInfo> {
	let url = format!("{}/api/auth_code", config.api_url);
	let body = serde_json::json!({ "code": code, "redirect_uri": redirect_uri }).to_string();
	let response = check_status(send(request(&url, "POST", Some(&body))?).await?).await?;
	let text = body_text(&response).await?;
	let exchange: AuthExchange = serde_json::from_str(&text)?;
	Ok(UserInfo {
		id: exchange.user_id,
		email: exchange.email,
		name: exchange.name,
		picture: exchange.picture,
	})
}
