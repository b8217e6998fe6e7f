//! Server-push progress stream for graph generation.
//!
//! The reconnect policy is an explicit state machine rather than nested
//! timers, so duplicate-connection avoidance and teardown stay checkable:
//! at most one `EventSource` is open per session, a transport error retries
//! after a fixed delay only while generation is still believed in progress,
//! and reaching 100% closes the stream and schedules a single snapshot
//! re-fetch after a settling delay.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventSource, MessageEvent};

/// Fixed delay before reconnecting after a transport error.
pub const RETRY_DELAY_MS: i32 = 2_000;
/// Settling delay between completion and the final snapshot re-fetch.
pub const SETTLE_DELAY_MS: i32 = 1_000;

/// Lifecycle of the progress stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamPhase {
	/// No stream has been opened yet.
	#[default]
	Idle,
	/// An `EventSource` exists but no event has arrived.
	Connecting,
	/// Events are flowing.
	Streaming,
	/// The transport failed; a reconnect is scheduled.
	Retrying,
	/// Done, torn down, or given up. Terminal.
	Closed,
}

/// Inputs to the state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
	/// The transport reported the connection open.
	Opened,
	/// A numeric progress report.
	Progress(f64),
	/// Server keep-alive marker; carries no progress.
	KeepAlive,
	/// The transport reported an error.
	TransportError,
	/// The owning component is going away.
	Teardown,
}

/// Side effect the transport glue must perform after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamAction {
	None,
	/// Drop the transport and reconnect after [`RETRY_DELAY_MS`].
	ScheduleRetry,
	/// Generation finished: drop the transport and re-fetch the snapshot
	/// once, after [`SETTLE_DELAY_MS`].
	CompleteAfterSettle,
	/// Drop the transport and stop.
	Close,
}

impl StreamPhase {
	/// Advances the machine. `generating` is whether the caller still
	/// believes a generation is in progress; it gates reconnection.
	pub fn on_event(self, event: &StreamEvent, generating: bool) -> (StreamPhase, StreamAction) {
		use StreamAction as A;
		use StreamPhase as P;

		match (self, event) {
			// Closed is terminal; a late timer or straggling event must
			// not resurrect the stream.
			(P::Closed, _) => (P::Closed, A::None),
			(_, StreamEvent::Teardown) => (P::Closed, A::Close),
			(_, StreamEvent::Opened) => (P::Streaming, A::None),
			(_, StreamEvent::KeepAlive) => (P::Streaming, A::None),
			(_, StreamEvent::Progress(p)) if *p >= 100.0 => (P::Closed, A::CompleteAfterSettle),
			(_, StreamEvent::Progress(_)) => (P::Streaming, A::None),
			(_, StreamEvent::TransportError) if generating => (P::Retrying, A::ScheduleRetry),
			(_, StreamEvent::TransportError) => (P::Closed, A::Close),
		}
	}
}

/// One SSE payload: `{ "progress": <number | "keep-alive"> }`.
#[derive(Debug, Deserialize)]
struct ProgressPayload {
	progress: ProgressValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProgressValue {
	Percent(f64),
	Marker(String),
}

/// Parses one payload into a machine event. Malformed payloads are dropped
/// with a warning and the stream continues.
fn parse_event(data: &str) -> Option<StreamEvent> {
	match serde_json::from_str::<ProgressPayload>(data) {
		Ok(ProgressPayload {
			progress: ProgressValue::Percent(p),
		}) => Some(StreamEvent::Progress(p)),
		Ok(ProgressPayload {
			progress: ProgressValue::Marker(marker),
		}) => {
			if marker != "keep-alive" {
				warn!("unrecognized progress marker: {marker}");
			}
			Some(StreamEvent::KeepAlive)
		}
		Err(e) => {
			warn!("dropping malformed progress event: {e}");
			None
		}
	}
}

/// Callbacks the stream reports through.
#[derive(Clone)]
pub struct StreamHooks {
	/// A numeric progress value arrived.
	pub on_progress: Rc<dyn Fn(f64)>,
	/// Generation completed and the settling delay has elapsed; fetch the
	/// final snapshot.
	pub on_complete: Rc<dyn Fn()>,
	/// Whether the caller still believes a generation is in progress.
	pub generating: Rc<dyn Fn() -> bool>,
}

struct Inner {
	phase: StreamPhase,
	source: Option<EventSource>,
	// Handlers are kept alive here until the next connect; dropping them
	// while the browser still holds the function would invalidate it.
	on_open: Option<Closure<dyn FnMut(Event)>>,
	on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
	on_error: Option<Closure<dyn FnMut(Event)>>,
}

/// Handle to the session's single progress stream.
pub struct ProgressStream {
	inner: Rc<RefCell<Inner>>,
}

impl Default for ProgressStream {
	fn default() -> Self {
		Self::new()
	}
}

impl ProgressStream {
	pub fn new() -> Self {
		Self {
			inner: Rc::new(RefCell::new(Inner {
				phase: StreamPhase::Idle,
				source: None,
				on_open: None,
				on_message: None,
				on_error: None,
			})),
		}
	}

	pub fn phase(&self) -> StreamPhase {
		self.inner.borrow().phase
	}

	/// Opens the stream, first dropping any prior transport so no two
	/// streams deliver events at once.
	pub fn connect(&self, url: &str, hooks: StreamHooks) {
		drop_transport(&self.inner);
		self.inner.borrow_mut().phase = StreamPhase::Connecting;

		let source = match EventSource::new(url) {
			Ok(source) => source,
			Err(e) => {
				warn!("failed to open progress stream: {e:?}");
				apply(&self.inner, url, &hooks, StreamEvent::TransportError);
				return;
			}
		};

		let on_open = {
			let (inner, url, hooks) = (self.inner.clone(), url.to_string(), hooks.clone());
			Closure::<dyn FnMut(Event)>::new(move |_: Event| {
				debug!("progress stream open");
				apply(&inner, &url, &hooks, StreamEvent::Opened);
			})
		};
		source.set_onopen(Some(on_open.as_ref().unchecked_ref()));

		let on_message = {
			let (inner, url, hooks) = (self.inner.clone(), url.to_string(), hooks.clone());
			Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
				let Some(data) = ev.data().as_string() else {
					return;
				};
				let Some(event) = parse_event(&data) else {
					return;
				};
				if let StreamEvent::Progress(p) = &event {
					(hooks.on_progress)(*p);
				}
				apply(&inner, &url, &hooks, event);
			})
		};
		source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let on_error = {
			let (inner, url, hooks) = (self.inner.clone(), url.to_string(), hooks.clone());
			Closure::<dyn FnMut(Event)>::new(move |_: Event| {
				apply(&inner, &url, &hooks, StreamEvent::TransportError);
			})
		};
		source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		let mut inner = self.inner.borrow_mut();
		inner.source = Some(source);
		inner.on_open = Some(on_open);
		inner.on_message = Some(on_message);
		inner.on_error = Some(on_error);
	}

	/// Tears the stream down. Safe to call repeatedly.
	pub fn close(&self) {
		let phase = self.inner.borrow().phase;
		let (next, action) = phase.on_event(&StreamEvent::Teardown, false);
		self.inner.borrow_mut().phase = next;
		if action == StreamAction::Close {
			drop_transport(&self.inner);
		}
	}
}

/// Feeds one event through the machine and performs the resulting action.
fn apply(inner: &Rc<RefCell<Inner>>, url: &str, hooks: &StreamHooks, event: StreamEvent) {
	let generating = (hooks.generating)();
	let (next, action) = {
		let phase = inner.borrow().phase;
		phase.on_event(&event, generating)
	};
	inner.borrow_mut().phase = next;

	match action {
		StreamAction::None => {}
		StreamAction::ScheduleRetry => {
			drop_transport(inner);
			let (inner, url, hooks) = (inner.clone(), url.to_string(), hooks.clone());
			schedule(RETRY_DELAY_MS, move || {
				// Teardown may have won the race while the timer ran.
				if inner.borrow().phase == StreamPhase::Retrying {
					debug!("reconnecting progress stream");
					ProgressStream { inner: inner.clone() }.connect(&url, hooks.clone());
				}
			});
		}
		StreamAction::CompleteAfterSettle => {
			drop_transport(inner);
			let hooks = hooks.clone();
			schedule(SETTLE_DELAY_MS, move || (hooks.on_complete)());
		}
		StreamAction::Close => drop_transport(inner),
	}
}

/// Detaches handlers and closes the transport, leaving the stored closures
/// alive until the next connect overwrites them.
fn drop_transport(inner: &Rc<RefCell<Inner>>) {
	let mut inner = inner.borrow_mut();
	if let Some(source) = inner.source.take() {
		source.set_onopen(None);
		source.set_onmessage(None);
		source.set_onerror(None);
		source.close();
	}
}

/// One-shot timer. The closure leaks if the page unloads before it fires,
/// which is the browser tearing the whole heap down anyway.
fn schedule(delay_ms: i32, f: impl FnOnce() + 'static) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let cb = Closure::once_into_js(f);
	if window
		.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)
		.is_err()
	{
		warn!("failed to schedule progress stream timer");
	}
}

#[cfg(test)]
mod tests {
	use super::StreamAction as A;
	use super::StreamEvent as E;
	use super::StreamPhase as P;
	use super::*;

	#[test]
	fn completion_closes_and_schedules_refetch() {
		let (next, action) = P::Streaming.on_event(&E::Progress(100.0), true);
		assert_eq!(next, P::Closed);
		assert_eq!(action, A::CompleteAfterSettle);

		// Values past 100 behave the same.
		let (next, action) = P::Streaming.on_event(&E::Progress(120.0), true);
		assert_eq!(next, P::Closed);
		assert_eq!(action, A::CompleteAfterSettle);
	}

	#[test]
	fn partial_progress_keeps_streaming() {
		let (next, action) = P::Connecting.on_event(&E::Progress(40.0), true);
		assert_eq!(next, P::Streaming);
		assert_eq!(action, A::None);
	}

	#[test]
	fn transport_error_retries_only_while_generating() {
		let (next, action) = P::Streaming.on_event(&E::TransportError, true);
		assert_eq!(next, P::Retrying);
		assert_eq!(action, A::ScheduleRetry);

		let (next, action) = P::Streaming.on_event(&E::TransportError, false);
		assert_eq!(next, P::Closed);
		assert_eq!(action, A::Close);
	}

	#[test]
	fn closed_is_terminal() {
		for event in [
			E::Opened,
			E::Progress(50.0),
			E::Progress(100.0),
			E::KeepAlive,
			E::TransportError,
			E::Teardown,
		] {
			let (next, action) = P::Closed.on_event(&event, true);
			assert_eq!(next, P::Closed);
			assert_eq!(action, A::None);
		}
	}

	#[test]
	fn teardown_closes_from_any_live_phase() {
		for phase in [P::Idle, P::Connecting, P::Streaming, P::Retrying] {
			let (next, action) = phase.on_event(&E::Teardown, true);
			assert_eq!(next, P::Closed);
			assert_eq!(action, A::Close);
		}
	}

	#[test]
	fn keep_alive_carries_no_progress() {
		assert_eq!(
			parse_event(r#"{"progress": "keep-alive"}"#),
			Some(E::KeepAlive)
		);
		let (next, action) = P::Streaming.on_event(&E::KeepAlive, true);
		assert_eq!(next, P::Streaming);
		assert_eq!(action, A::None);
	}

	#[test]
	fn malformed_payloads_are_dropped() {
		assert_eq!(parse_event("not json"), None);
		assert_eq!(parse_event(r#"{"progress": null}"#), None);
		assert_eq!(parse_event(r#"{"pct": 10}"#), None);
	}

	#[test]
	fn numeric_payloads_parse() {
		assert_eq!(
			parse_event(r#"{"progress": 42}"#),
			Some(E::Progress(42.0))
		);
		assert_eq!(
			parse_event(r#"{"progress": 99.5}"#),
			Some(E::Progress(99.5))
		);
	}
}
