//! Session identity persisted across reloads.
//!
//! The reactive session state itself lives in the application shell; this
//! module is only the `localStorage` glue behind it, so storage access
//! stays in one place instead of being scattered across handlers.

use log::warn;
use serde::{Deserialize, Serialize};

/// Identity returned by the auth-code exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
	pub id: String,
	pub email: String,
	pub name: String,
	pub picture: String,
}

const STORAGE_KEY: &str = "userInfo";

fn storage() -> Option<web_sys::Storage> {
	web_sys::window()?.local_storage().ok()?
}

/// Loads the stored identity, if any. Unreadable entries are discarded.
pub fn load() -> Option<UserInfo> {
	let raw = storage()?.get_item(STORAGE_KEY).ok()??;
	match serde_json::from_str(&raw) {
		Ok(info) => Some(info),
		Err(e) => {
			warn!("discarding unreadable stored session: {e}");
			clear();
			None
		}
	}
}

/// Persists the identity for continuity across reloads.
pub fn store(info: &UserInfo) {
	let Some(storage) = storage() else {
		return;
	};
	match serde_json::to_string(info) {
		Ok(json) => {
			if storage.set_item(STORAGE_KEY, &json).is_err() {
				warn!("failed to persist session");
			}
		}
		Err(e) => warn!("failed to serialize session: {e}"),
	}
}

/// Removes the stored identity (logout or expiry).
pub fn clear() {
	if let Some(storage) = storage() {
		let _ = storage.remove_item(STORAGE_KEY);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_round_trips_through_json() {
		let info = UserInfo {
			id: "u-1".into(),
			email: "ada@example.com".into(),
			name: "Ada".into(),
			picture: "https://example.com/ada.png".into(),
		};
		let json = serde_json::to_string(&info).unwrap();
		assert_eq!(serde_json::from_str::<UserInfo>(&json).unwrap(), info);
	}

	#[test]
	fn missing_fields_default_to_empty() {
		let info: UserInfo = serde_json::from_str(r#"{"id": "u-1"}"#).unwrap();
		assert_eq!(info.id, "u-1");
		assert_eq!(info.picture, "");
	}
}
