//! Colorful console output for loadout searches.
//!
//! Provides a custom `tracing` layer that formats search events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (pools built, search start/end)
//! - **WARN**: Stat engine failures
//! - **DEBUG**: Progress updates (at most 1/sec per worker)

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SEARCH_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and installs a subscriber honoring `RUST_LOG`,
/// defaulting to `runeforge_solver=info`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let default: Directive = "runeforge_solver=info"
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let filter = EnvFilter::builder()
            .with_default_directive(default)
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SearchConsoleLayer)
            .try_init();
    });
}

fn mark_search_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SEARCH_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SEARCH_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____                  _____
|  _ \ _   _ _ __   ___|  ___|__  _ __ __ _  ___
| |_) | | | | '_ \ / _ \ |_ / _ \| '__/ _` |/ _ \
|  _ <| |_| | | | |  __/  _| (_) | | | (_| |  __/
|_| \_\\__,_|_| |_|\___|_|  \___/|_|  \__, |\___|
                                      |___/
"#;

    let version_line = format!("              v{} - Rune Loadout Optimizer\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats search events with colors.
pub struct SearchConsoleLayer;

impl<S: Subscriber> Layer<S> for SearchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("runeforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    character: Option<String>,
    sizes: Option<String>,
    pruned_sets: Option<String>,
    stop_reason: Option<String>,
    error: Option<String>,
    inventory: Option<u64>,
    combinations: Option<u64>,
    total: Option<u64>,
    threads: Option<u64>,
    completed: Option<u64>,
    evaluated: Option<u64>,
    passed: Option<u64>,
    discarded: Option<u64>,
    retained: Option<u64>,
    duration_ms: Option<u64>,
    speed: Option<u64>,
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "character" => self.character = Some(value),
            "sizes" => self.sizes = Some(value),
            "pruned_sets" => self.pruned_sets = Some(value),
            "stop_reason" => self.stop_reason = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_text(field, s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "inventory" => self.inventory = Some(value),
            "combinations" => self.combinations = Some(value),
            "total" => self.total = Some(value),
            "threads" => self.threads = Some(value),
            "completed" => self.completed = Some(value),
            "evaluated" => self.evaluated = Some(value),
            "passed" => self.passed = Some(value),
            "discarded" => self.discarded = Some(value),
            "retained" => self.retained = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "speed" => self.speed = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "pool_built" => format_pool_built(v),
        "search_start" => format_search_start(v),
        "progress" => format_progress(v),
        "search_end" => format_search_end(v),
        "engine_error" => format_engine_error(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_pool_built(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Pools for {} │ {} runes │ sizes {} │ {} combinations",
        format_elapsed(),
        "◆".bright_blue(),
        v.character.as_deref().unwrap_or("?").white().bold(),
        count(v.inventory).bright_yellow(),
        v.sizes.as_deref().unwrap_or("[]").bright_black(),
        count(v.combinations).bright_magenta(),
    );

    if let Some(pruned) = v.pruned_sets.as_deref().filter(|p| *p != "[]") {
        output.push_str(&format!(" │ pruned {}", pruned.yellow()));
    }

    output
}

fn format_search_start(v: &EventVisitor) -> String {
    mark_search_start();
    format!(
        "{} {} Searching │ {} combinations │ {} threads",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.total).bright_yellow(),
        count(v.threads).bright_yellow(),
    )
}

fn format_progress(v: &EventVisitor) -> String {
    let completed = v.completed.unwrap_or(0);
    let total = v.total.unwrap_or(0);
    let percent = if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    };

    format!(
        "{} {} {:>14} / {} │ {:>6.2}% │ {} passed",
        format_elapsed(),
        "⚡".bright_cyan(),
        count(Some(completed)).white(),
        count(Some(total)),
        percent.bright_magenta().bold(),
        count(v.passed).bright_green(),
    )
}

fn format_search_end(v: &EventVisitor) -> String {
    let reason = v.stop_reason.as_deref().unwrap_or("unknown");
    let reason = if reason == "exhausted" {
        reason.bright_green().to_string()
    } else {
        reason.yellow().to_string()
    };

    format!(
        "{} {} Search complete │ {} │ {} evaluated │ {} passed │ {} discarded │ {} kept │ {}/s │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.evaluated).white(),
        count(v.passed).bright_green(),
        count(v.discarded).bright_black(),
        count(v.retained).bright_yellow(),
        count(v.speed).bright_magenta().bold(),
        reason,
    )
}

fn format_engine_error(v: &EventVisitor) -> String {
    format!(
        "{} {} Stat engine failed │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        v.error.as_deref().unwrap_or("unknown error").bright_red(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let visitor = EventVisitor {
            event: Some("termination".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_search_end_line() {
        let visitor = EventVisitor {
            event: Some("search_end".to_string()),
            evaluated: Some(1_234_567),
            stop_reason: Some("time limit".to_string()),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("Search complete"));
        assert!(line.contains("1,234,567"));
        assert!(line.contains("time limit"));
    }

    #[test]
    fn test_pool_line_mentions_pruned_sets() {
        let visitor = EventVisitor {
            event: Some("pool_built".to_string()),
            character: Some("Tester".to_string()),
            pruned_sets: Some("[Violent]".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).contains("Violent"));

        let visitor = EventVisitor {
            pruned_sets: Some("[]".to_string()),
            ..visitor
        };
        assert!(!format_event(&visitor).contains("pruned"));
    }
}
