//! Beyond Meet: interactive visualization of a professional network built
//! from email interaction data.
//!
//! This crate is the WASM front-end: it handles Google OAuth login, fetches
//! the graph snapshot from the backend, follows generation progress over a
//! server-push stream, renders the network with a physics-based canvas
//! layout, and lets the user search, highlight, and edit contacts.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod progress;
pub mod session;

use components::details_panel::DetailsPanel;
use components::force_graph::ForceGraphCanvas;
use components::loading::LoadingScreen;
use components::login::{self, LoginScreen};
use components::search_bar::SearchBar;
use config::Config;
use error::ApiError;
use graph::search::{self, Query};
use graph::{ContactNode, GraphData};
use progress::{ProgressStream, StreamHooks};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("beyond-meet: logging initialized");
}

/// Main application component.
///
/// Owns the session, the graph snapshot, and the query state, and routes
/// between the login, error, loading, empty-graph, and graph views.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	let config = Config::from_build_env();

	// Session identity: loaded once at startup, cleared on logout/expiry.
	let user = RwSignal::new(session::load());
	let graph_data = RwSignal::new(GraphData::default());
	let loaded = RwSignal::new(false);
	let error = RwSignal::new(Option::<String>::None);
	let generating = RwSignal::new(false);
	let progress_pct = RwSignal::new(0.0_f64);
	let auto_generated = RwSignal::new(false);
	// Bumping this re-runs the snapshot fetch.
	let refetch = RwSignal::new(0_u32);

	// Query state: free text and pinned selection are mutually exclusive.
	let search_term = RwSignal::new(String::new());
	let selected_id = RwSignal::new(Option::<String>::None);
	let selected_node = RwSignal::new(Option::<ContactNode>::None);

	let highlight = Memo::new(move |_| {
		let term = search_term.get();
		let selected = selected_id.get();
		graph_data.with(|graph| {
			search::compute_highlight(graph, &Query::from_parts(&term, selected.as_deref()))
		})
	});

	let expire_session = move || {
		session::clear();
		user.set(None);
		graph_data.set(GraphData::default());
		loaded.set(false);
		error.set(Some(ApiError::SessionExpired.to_string()));
	};

	// The session holds at most one progress stream. The EventSource glue
	// is not thread-safe, so the handle is stored locally; closed on
	// teardown.
	let stream = StoredValue::new_local(ProgressStream::new());
	on_cleanup(move || stream.with_value(|s| s.close()));

	let connect_stream = move || {
		let Some(info) = user.get_untracked() else {
			return;
		};
		let hooks = StreamHooks {
			on_progress: Rc::new(move |p| progress_pct.set(p)),
			on_complete: Rc::new(move || {
				generating.set(false);
				refetch.update(|n| *n += 1);
			}),
			generating: Rc::new(move || generating.get_untracked()),
		};
		let url = format!("{}/api/graph/progress?user_id={}", config.api_url, info.id);
		stream.with_value(|s| s.connect(&url, hooks));
	};

	let start_generation = move || {
		let Some(info) = user.get_untracked() else {
			return;
		};
		generating.set(true);
		progress_pct.set(0.0);
		error.set(None);
		// Attach the stream before the trigger so no event is missed.
		connect_stream();

		spawn_local(async move {
			match api::start_generation(&config, &info.id).await {
				Ok(()) => {}
				Err(ApiError::SessionExpired) => {
					stream.with_value(|s| s.close());
					generating.set(false);
					expire_session();
				}
				Err(e) => {
					warn!("failed to start generation: {e}");
					stream.with_value(|s| s.close());
					generating.set(false);
					error.set(Some(e.to_string()));
				}
			}
		});
	};

	// Snapshot fetch: on login, on demand (refetch), and after completion.
	Effect::new(move |_| {
		refetch.track();
		let Some(info) = user.get() else {
			return;
		};
		spawn_local(async move {
			match api::fetch_graph(&config, &info.id).await {
				Ok(data) => {
					error.set(None);
					generating.set(data.is_generating);
					if data.is_generating {
						progress_pct.set(data.current_progress.unwrap_or(0.0));
						connect_stream();
					} else if data.is_empty() && !auto_generated.get_untracked() {
						// An empty graph is not an error; build one.
						auto_generated.set(true);
						graph_data.set(data);
						loaded.set(true);
						start_generation();
						return;
					}
					graph_data.set(data);
					loaded.set(true);
				}
				Err(ApiError::SessionExpired) => expire_session(),
				Err(e) => {
					warn!("failed to fetch graph: {e}");
					error.set(Some(e.to_string()));
				}
			}
		});
	});

	// Returning leg of the OAuth redirect: exchange the code, then the
	// fetch effect picks the new session up.
	if user.get_untracked().is_none() {
		if let Some(code) = login::take_auth_code() {
			spawn_local(async move {
				let origin = web_sys::window()
					.and_then(|w| w.location().origin().ok())
					.unwrap_or_default();
				match api::exchange_auth_code(&config, &code, &origin).await {
					Ok(info) => {
						session::store(&info);
						error.set(None);
						user.set(Some(info));
					}
					Err(e) => {
						warn!("auth code exchange failed: {e}");
						error.set(Some(format!("Login failed. {e}")));
					}
				}
			});
		}
	}

	let on_search = move |term: String| {
		// Typing clears any pinned selection.
		selected_id.set(None);
		search_term.set(term);
	};

	let on_node_select = move |id: String| {
		// Selecting clears the text query.
		search_term.set(String::new());
		selected_node.set(graph_data.with_untracked(|g| g.node_by_id(&id).cloned()));
		selected_id.set(Some(id));
	};

	let on_suggestion_select = move |node: ContactNode| {
		search_term.set(String::new());
		selected_id.set(Some(node.id.clone()));
		selected_node.set(Some(node));
	};

	let logout = move || {
		stream.with_value(|s| s.close());
		session::clear();
		user.set(None);
		graph_data.set(GraphData::default());
		loaded.set(false);
		generating.set(false);
		error.set(None);
		search_term.set(String::new());
		selected_id.set(None);
		selected_node.set(None);
	};

	let user_id = Signal::derive(move || user.get().map(|u| u.id).unwrap_or_default());

	let main_view = move || {
		if user.get().is_none() {
			return view! { <LoginScreen error=error /> }.into_any();
		}

		if let Some(message) = error.get() {
			let retry = move |_| {
				error.set(None);
				refetch.update(|n| *n += 1);
			};
			return view! {
				<div class="error-screen">
					<h1>"Error"</h1>
					<p>{message}</p>
					<button on:click=retry>"Try Again"</button>
				</div>
			}
			.into_any();
		}

		if generating.get() {
			return view! { <LoadingScreen progress=progress_pct /> }.into_any();
		}

		if !loaded.get() {
			return view! {
				<div class="boot-screen">
					<p>"Loading your network..."</p>
				</div>
			}
			.into_any();
		}

		if graph_data.with(GraphData::is_empty) {
			return view! {
				<div class="welcome-screen">
					<h1>"Welcome to Beyond Meet"</h1>
					<p>"Generate your social connection graph from your email history."</p>
					<button on:click=move |_| start_generation()>"Generate Graph"</button>
				</div>
			}
			.into_any();
		}

		view! {
			<main class="graph-shell">
				<div class="graph-toolbar">
					<SearchBar
						data=graph_data
						on_search=on_search
						on_select=on_suggestion_select
					/>
					<button class="regenerate" on:click=move |_| start_generation()>
						"Regenerate Graph"
					</button>
					{move || {
						user.get()
							.map(|info| {
								view! {
									<div class="user-chip">
										<span class="user-name">{info.name.clone()}</span>
										<img class="user-avatar" src=info.picture.clone() alt=info.name />
									</div>
								}
							})
					}}
					<button class="sign-out" on:click=move |_| logout()>
						"Sign out"
					</button>
				</div>

				<ForceGraphCanvas
					data=graph_data
					highlight=highlight
					on_select=on_node_select
					fullscreen=true
				/>

				<DetailsPanel
					node=selected_node
					user_id=user_id
					on_close=move |_: ()| selected_node.set(None)
				/>
			</main>
		}
		.into_any()
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Beyond Meet" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{main_view}
	}
}
