//! Event system for search monitoring.
//!
//! Listeners receive progress, result and completion notifications while a
//! search runs. Callbacks may arrive from any worker thread; a caller that
//! needs single-threaded delivery can use [`ChannelEventListener`] and
//! drain the receiver where it wants.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use runeforge_solver::event::{SearchEventListener, SearchEventSupport};
//!
//! #[derive(Debug)]
//! struct PrintProgress;
//!
//! impl SearchEventListener for PrintProgress {
//!     fn on_progress(&self, fraction: f64) {
//!         println!("{:.1}%", fraction * 100.0);
//!     }
//! }
//!
//! let mut support = SearchEventSupport::new();
//! support.add_listener(Arc::new(PrintProgress));
//! support.fire_progress(0.5);
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use runeforge_core::SLOT_COUNT;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::result::{ResultSet, ScoredLoadout};

/// Message sent when a search finishes without a passing loadout.
pub const NO_RESULTS_MESSAGE: &str = "No builds found";

/// Listener for search events. Every method defaults to a no-op.
pub trait SearchEventListener: Send + Sync + Debug {
    /// Evaluated fraction of the space, 0..=1.
    fn on_progress(&self, _fraction: f64) {}

    /// Raw evaluated count next to the total.
    fn on_progress_count(&self, _completed: u64, _total: u64) {}

    /// Human-readable status text.
    fn on_progress_message(&self, _message: &str) {}

    /// A passing loadout was retained.
    fn on_result_added(&self, _build: &ScoredLoadout<'_>) {}

    /// A retained loadout was dropped from the final set.
    fn on_result_removed(&self, _build: &ScoredLoadout<'_>) {}

    /// The search finished. Fired exactly once per run.
    fn on_completed(&self, _results: &ResultSet<'_>) {}
}

/// Central event broadcaster for search events.
///
/// Listeners are called synchronously in registration order.
pub struct SearchEventSupport<'l> {
    listeners: Vec<Arc<dyn SearchEventListener + 'l>>,
}

impl<'l> SearchEventSupport<'l> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SearchEventListener + 'l>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn fire_progress(&self, fraction: f64) {
        for listener in &self.listeners {
            listener.on_progress(fraction);
        }
    }

    pub fn fire_progress_count(&self, completed: u64, total: u64) {
        for listener in &self.listeners {
            listener.on_progress_count(completed, total);
        }
    }

    pub fn fire_progress_message(&self, message: &str) {
        for listener in &self.listeners {
            listener.on_progress_message(message);
        }
    }

    pub fn fire_result_added(&self, build: &ScoredLoadout<'_>) {
        for listener in &self.listeners {
            listener.on_result_added(build);
        }
    }

    pub fn fire_result_removed(&self, build: &ScoredLoadout<'_>) {
        for listener in &self.listeners {
            listener.on_result_removed(build);
        }
    }

    pub fn fire_completed(&self, results: &ResultSet<'_>) {
        for listener in &self.listeners {
            listener.on_completed(results);
        }
    }
}

impl Default for SearchEventSupport<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SearchEventSupport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Logs search events through `tracing`.
#[derive(Debug, Default)]
pub struct LoggingEventListener;

impl LoggingEventListener {
    pub fn new() -> Self {
        Self
    }
}

impl SearchEventListener for LoggingEventListener {
    fn on_progress_message(&self, message: &str) {
        debug!(event = "progress_message", message);
    }

    fn on_result_added(&self, build: &ScoredLoadout<'_>) {
        debug!(event = "result_added", score = build.score, runes = ?build.rune_ids());
    }

    fn on_completed(&self, results: &ResultSet<'_>) {
        info!(
            event = "results",
            count = results.len(),
            best_score = results.best().map(|b| b.score),
        );
    }
}

/// Counts events. Useful for tests and quick diagnostics.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    progress: AtomicUsize,
    added: AtomicUsize,
    removed: AtomicUsize,
    completed: AtomicUsize,
    last_completed_count: AtomicU64,
    last_fraction: Mutex<f64>,
    messages: Mutex<Vec<String>>,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_count(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    pub fn added_count(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    pub fn removed_count(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Most recent raw completed count.
    pub fn last_completed(&self) -> u64 {
        self.last_completed_count.load(Ordering::SeqCst)
    }

    pub fn last_fraction(&self) -> f64 {
        *self.last_fraction.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SearchEventListener for CountingEventListener {
    fn on_progress(&self, fraction: f64) {
        self.progress.fetch_add(1, Ordering::SeqCst);
        *self.last_fraction.lock().unwrap_or_else(PoisonError::into_inner) = fraction;
    }

    fn on_progress_count(&self, completed: u64, _total: u64) {
        self.last_completed_count.store(completed, Ordering::SeqCst);
    }

    fn on_progress_message(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn on_result_added(&self, _build: &ScoredLoadout<'_>) {
        self.added.fetch_add(1, Ordering::SeqCst);
    }

    fn on_result_removed(&self, _build: &ScoredLoadout<'_>) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_completed(&self, _results: &ResultSet<'_>) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

type MessageFn<'f> = dyn Fn(&str) + Send + Sync + 'f;
type ProgressFn<'f> = dyn Fn(f64) + Send + Sync + 'f;

/// Adapts a message callback and a progress callback into a listener.
pub struct FnEventListener<'f> {
    on_message: Option<&'f MessageFn<'f>>,
    on_progress: Option<&'f ProgressFn<'f>>,
}

impl<'f> FnEventListener<'f> {
    pub fn new(
        on_message: Option<&'f MessageFn<'f>>,
        on_progress: Option<&'f ProgressFn<'f>>,
    ) -> Self {
        Self {
            on_message,
            on_progress,
        }
    }
}

impl Debug for FnEventListener<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEventListener")
            .field("on_message", &self.on_message.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl SearchEventListener for FnEventListener<'_> {
    fn on_progress(&self, fraction: f64) {
        if let Some(callback) = self.on_progress {
            callback(fraction);
        }
    }

    fn on_progress_message(&self, message: &str) {
        if let Some(callback) = self.on_message {
            callback(message);
        }
    }
}

/// Owned form of a search event.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Progress(f64),
    ProgressCount { completed: u64, total: u64 },
    Message(String),
    ResultAdded { runes: [u64; SLOT_COUNT], score: f64 },
    ResultRemoved { runes: [u64; SLOT_COUNT], score: f64 },
    Completed { count: usize, best_score: Option<f64> },
}

/// Forwards events into an unbounded channel.
///
/// Sends after the receiver is dropped are ignored.
///
/// ```
/// use runeforge_solver::event::{ChannelEventListener, SearchEvent, SearchEventListener};
///
/// let (listener, mut events) = ChannelEventListener::new();
/// listener.on_progress(0.25);
/// assert_eq!(events.try_recv().unwrap(), SearchEvent::Progress(0.25));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelEventListener {
    sender: mpsc::UnboundedSender<SearchEvent>,
}

impl ChannelEventListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: SearchEvent) {
        let _ = self.sender.send(event);
    }
}

impl SearchEventListener for ChannelEventListener {
    fn on_progress(&self, fraction: f64) {
        self.send(SearchEvent::Progress(fraction));
    }

    fn on_progress_count(&self, completed: u64, total: u64) {
        self.send(SearchEvent::ProgressCount { completed, total });
    }

    fn on_progress_message(&self, message: &str) {
        self.send(SearchEvent::Message(message.to_string()));
    }

    fn on_result_added(&self, build: &ScoredLoadout<'_>) {
        self.send(SearchEvent::ResultAdded {
            runes: build.rune_ids(),
            score: build.score,
        });
    }

    fn on_result_removed(&self, build: &ScoredLoadout<'_>) {
        self.send(SearchEvent::ResultRemoved {
            runes: build.rune_ids(),
            score: build.score,
        });
    }

    fn on_completed(&self, results: &ResultSet<'_>) {
        self.send(SearchEvent::Completed {
            count: results.len(),
            best_score: results.best().map(|b| b.score),
        });
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
