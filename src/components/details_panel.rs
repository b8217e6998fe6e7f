//! Sliding panel showing the selected contact, with inline editing.
//!
//! Edits accumulate in a local copy of the node; Save pushes the full body
//! through the update endpoint. A failed save keeps the edits in place so
//! nothing typed is lost.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api;
use crate::config::Config;
use crate::graph::ContactNode;

#[derive(Clone, Debug, PartialEq)]
enum SaveState {
	Idle,
	Saving,
	Saved,
	Failed(String),
}

/// One labeled text input bound to a field of the edited contact.
fn editable_field(
	label: &'static str,
	edited: RwSignal<Option<ContactNode>>,
	dirty: RwSignal<bool>,
	get: fn(&ContactNode) -> &str,
	set: fn(&mut ContactNode, String),
) -> impl IntoView {
	view! {
		<div class="field">
			<label>{label}</label>
			<input
				type="text"
				prop:value=move || {
					edited.with(|n| n.as_ref().map(|n| get(n).to_string()).unwrap_or_default())
				}
				on:input=move |ev| {
					edited
						.update(|n| {
							if let Some(n) = n {
								set(n, event_target_value(&ev));
							}
						});
					dirty.set(true);
				}
			/>
		</div>
	}
}

/// Contact detail panel for the pinned node.
#[component]
pub fn DetailsPanel(
	#[prop(into)] node: Signal<Option<ContactNode>>,
	#[prop(into)] user_id: Signal<String>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let config = Config::from_build_env();
	let edited = RwSignal::new(None::<ContactNode>);
	let dirty = RwSignal::new(false);
	let status = RwSignal::new(SaveState::Idle);

	// A new selection replaces any in-progress edits.
	Effect::new(move |_| {
		edited.set(node.get());
		dirty.set(false);
		status.set(SaveState::Idle);
	});

	let save = move |_| {
		let Some(contact) = edited.get_untracked() else {
			return;
		};
		let uid = user_id.get_untracked();
		status.set(SaveState::Saving);
		spawn_local(async move {
			match api::update_node(&config, &uid, &contact).await {
				Ok(()) => {
					status.set(SaveState::Saved);
					dirty.set(false);
				}
				Err(e) => {
					warn!("failed to save contact: {e}");
					status.set(SaveState::Failed(e.to_string()));
				}
			}
		});
	};

	let meetings = move || {
		edited.with(|n| {
			n.as_ref()
				.map(|n| n.meetings.clone())
				.unwrap_or_default()
		})
	};

	view! {
		<Show when=move || edited.with(Option::is_some)>
			<div class="details-panel">
				<div class="details-header">
					<input
						type="text"
						class="details-email"
						readonly=true
						prop:value=move || {
							edited.with(|n| n.as_ref().map(|n| n.email.clone()).unwrap_or_default())
						}
					/>
					<button class="details-close" on:click=move |_| on_close.run(())>
						"\u{2715}"
					</button>
				</div>

				<div class="details-body">
					<section>
						<h3>"Contact Info"</h3>
						{editable_field("Name", edited, dirty, |n| &n.name, |n, v| n.name = v)}
						{editable_field(
							"First Name",
							edited,
							dirty,
							|n| &n.first_name,
							|n, v| n.first_name = v,
						)}
						{editable_field(
							"Last Name",
							edited,
							dirty,
							|n| &n.last_name,
							|n, v| n.last_name = v,
						)}
					</section>

					<section>
						<h3>"Company Info"</h3>
						{editable_field("Company", edited, dirty, |n| &n.company, |n, v| n.company = v)}
						{editable_field(
							"Domain",
							edited,
							dirty,
							|n| &n.company_domain,
							|n, v| n.company_domain = v,
						)}
						{editable_field(
							"LinkedIn URL",
							edited,
							dirty,
							|n| &n.linkedin_url,
							|n, v| n.linkedin_url = v,
						)}
					</section>

					<section>
						<h3>"Notes"</h3>
						<textarea
							prop:value=move || {
								edited.with(|n| n.as_ref().map(|n| n.notes.clone()).unwrap_or_default())
							}
							on:input=move |ev| {
								edited
									.update(|n| {
										if let Some(n) = n {
											n.notes = event_target_value(&ev);
										}
									});
								dirty.set(true);
							}
						></textarea>
					</section>

					<section>
						<h3>"Meeting History"</h3>
						{move || {
							let rows = meetings();
							if rows.is_empty() {
								view! { <p class="details-empty">"No meetings recorded."</p> }
									.into_any()
							} else {
								rows.into_iter()
									.map(|m| {
										view! {
											<div class="meeting-row">
												<span class="meeting-date">{m.date}</span>
												<span class="meeting-title">{m.title}</span>
												<span class="meeting-location">{m.location}</span>
											</div>
										}
									})
									.collect_view()
									.into_any()
							}
						}}
					</section>
				</div>

				<div class="details-footer">
					<button
						class="details-save"
						disabled=move || {
							!dirty.get() || status.get() == SaveState::Saving
						}
						on:click=save
					>
						{move || {
							if status.get() == SaveState::Saving { "Saving..." } else { "Save" }
						}}
					</button>
					{move || match status.get() {
						SaveState::Saved => {
							Some(view! { <span class="details-status">"Saved"</span> }.into_any())
						}
						SaveState::Failed(message) => {
							Some(
								view! { <span class="details-status details-error">{message}</span> }
									.into_any(),
							)
						}
						SaveState::Idle | SaveState::Saving => None,
					}}
				</div>
			</div>
		</Show>
	}
}
