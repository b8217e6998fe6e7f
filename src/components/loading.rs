//! Full-screen progress view shown while the backend builds the graph.

use leptos::prelude::*;

/// Status copy for each generation stage.
fn stage_message(progress: f64) -> &'static str {
	if progress < 30.0 {
		"Fetching your email interactions..."
	} else if progress < 60.0 {
		"Processing connections..."
	} else if progress < 90.0 {
		"Building your network graph..."
	} else {
		"Finalizing visualization..."
	}
}

/// Progress bar driven by the push stream.
#[component]
pub fn LoadingScreen(#[prop(into)] progress: Signal<f64>) -> impl IntoView {
	view! {
		<div class="loading-screen">
			<div class="loading-card">
				<h2>"Analyzing Your Network"</h2>
				<p class="loading-stage">{move || stage_message(progress.get())}</p>
				<div class="progress-track">
					<div
						class="progress-fill"
						style:width=move || format!("{}%", progress.get().clamp(0.0, 100.0))
					></div>
				</div>
				<div class="progress-caption">
					{move || format!("{:.0}% Complete", progress.get())}
				</div>
				<p class="loading-tip">
					"Tip: You can search through your network using the search bar once the graph is ready"
				</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stage_copy_follows_progress_bands() {
		assert_eq!(stage_message(0.0), "Fetching your email interactions...");
		assert_eq!(stage_message(29.9), "Fetching your email interactions...");
		assert_eq!(stage_message(30.0), "Processing connections...");
		assert_eq!(stage_message(60.0), "Building your network graph...");
		assert_eq!(stage_message(95.0), "Finalizing visualization...");
	}
}
