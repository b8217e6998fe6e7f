//! Search box with ranked autocomplete suggestions.
//!
//! Typing reports the raw term upwards on every keystroke (the highlight
//! engine recomputes from it) and shows the ranked suggestion dropdown.
//! Choosing a suggestion pins that contact instead, which clears the text
//! query in the shell.

use leptos::prelude::*;

use crate::graph::suggest::{self, MatchField};
use crate::graph::{ContactNode, GraphData};

/// One owned dropdown row, detached from the graph borrow.
#[derive(Clone, PartialEq)]
struct SuggestionRow {
	node: ContactNode,
	field: MatchField,
	value: String,
}

/// Secondary line under a suggestion: who this is and where they work.
fn row_subtitle(row: &SuggestionRow) -> String {
	let contact = &row.node;
	let mut parts: Vec<String> = Vec::new();
	if !contact.first_name.is_empty() && !contact.last_name.is_empty() {
		parts.push(format!("{} {}", contact.first_name, contact.last_name));
	} else if !contact.name.is_empty() && contact.name != contact.email {
		parts.push(contact.name.clone());
	}
	parts.push(contact.email.clone());
	if !contact.company.is_empty() && row.field != MatchField::Company {
		parts.push(contact.company.clone());
	}
	parts.join(" \u{2022} ")
}

/// Search input with a suggestion dropdown over the current graph.
#[component]
pub fn SearchBar(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] on_search: Callback<String>,
	#[prop(into)] on_select: Callback<ContactNode>,
) -> impl IntoView {
	let term = RwSignal::new(String::new());
	let open = RwSignal::new(false);

	let rows = move || {
		let term = term.get();
		data.with(|graph| {
			suggest::suggestions(&graph.nodes, &term)
				.into_iter()
				.map(|s| SuggestionRow {
					node: s.node.clone(),
					field: s.field,
					value: s.value.to_string(),
				})
				.collect::<Vec<_>>()
		})
	};

	let on_input = move |ev| {
		let value = event_target_value(&ev);
		term.set(value.clone());
		open.set(true);
		on_search.run(value);
	};

	let clear = move |_| {
		term.set(String::new());
		open.set(false);
		on_search.run(String::new());
	};

	view! {
		<div class="search-bar">
			<input
				type="text"
				placeholder="Search connections..."
				prop:value=move || term.get()
				on:input=on_input
				on:keydown=move |ev| {
					if ev.key() == "Escape" {
						open.set(false);
					}
				}
			/>
			<Show when=move || !term.with(String::is_empty)>
				<button class="search-clear" on:click=clear>
					"\u{2715}"
				</button>
			</Show>
			<Show when=move || open.get() && !rows().is_empty()>
				<div class="search-suggestions">
					{move || {
						rows()
							.into_iter()
							.map(|row| {
								let subtitle = row_subtitle(&row);
								let value = row.value.clone();
								let node = row.node.clone();
								let choose = move |_| {
									term.set(value.clone());
									open.set(false);
									on_select.run(node.clone());
								};
								view! {
									<div class="search-suggestion" on:mousedown=choose>
										<div class="suggestion-value">{row.value.clone()}</div>
										<div class="suggestion-subtitle">{subtitle}</div>
									</div>
								}
							})
							.collect_view()
					}}
				</div>
			</Show>
		</div>
	}
}
