//! Configuration system for RuneForge.
//!
//! Load build and search configuration from TOML or YAML. A build
//! configuration says *what* a good loadout is (weights, thresholds, sets,
//! candidate filters); a search configuration says *how* to look for it
//! (result count, time budget, retention, threads).
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use runeforge_config::OptimizerConfig;
//! use runeforge_core::{Attribute, RuneSet, Tier};
//! use std::time::Duration;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     [search]
//!     top = 5
//!     time_limit_secs = 30
//!
//!     [build]
//!     build_sets = ["Violent", "Energy"]
//!     required_sets = ["Violent"]
//!
//!     [build.sort]
//!     SPD = 1
//!     HP = 100
//!
//!     [build.minimum]
//!     SPD = 150
//!
//!     [build.rune_filters.g.SPD]
//!     test = 10
//! "#).unwrap();
//!
//! assert_eq!(config.search.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.build.sort[Attribute::Hp], 100.0);
//! assert!(config.build.filter(Tier::Global, Attribute::Spd).is_some());
//! assert!(config.build.required_sets.contains(&RuneSet::Violent));
//! ```
//!
//! Unknown attribute names are rejected while parsing:
//!
//! ```
//! use runeforge_config::BuildConfig;
//!
//! let err = BuildConfig::from_toml_str(r#"
//!     [sort]
//!     SPEED = 1
//! "#);
//! assert!(err.is_err());
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use runeforge_core::{
    Attribute, AttributeVector, FilterOperator, Prediction, RuneFilter, RuneForgeError, RuneSet,
    StatKind, Tier,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Domain(#[from] RuneForgeError),
}

/// Per-tier threshold filters, keyed by attribute.
pub type TierFilters = BTreeMap<Attribute, RuneFilter>;

/// Combined file layout: `[search]` and `[build]` tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

impl OptimizerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build.validate()
    }
}

/// What makes a loadout acceptable and how good it is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Scoring divisors. Zero ignores the attribute.
    #[serde(default)]
    pub sort: AttributeVector,

    /// Hard lower bounds. Zero means unconstrained.
    #[serde(default)]
    pub minimum: AttributeVector,

    /// Soft caps: value above a non-zero maximum is penalized.
    #[serde(default)]
    pub maximum: AttributeVector,

    /// Sets every result must complete.
    #[serde(default)]
    pub required_sets: Vec<RuneSet>,

    /// Sets whose runes may enter the candidate pools.
    #[serde(default)]
    pub build_sets: Vec<RuneSet>,

    /// Allowed main stats for slots 2, 4 and 6. Empty allows any.
    #[serde(default)]
    pub slot_main_stats: BTreeMap<Tier, Vec<StatKind>>,

    /// Whether results may carry incomplete sets.
    #[serde(default)]
    pub allow_broken: bool,

    #[serde(default)]
    pub rune_filters: BTreeMap<Tier, TierFilters>,

    #[serde(default)]
    pub rune_scoring: BTreeMap<Tier, FilterOperator>,

    #[serde(default)]
    pub rune_prediction: BTreeMap<Tier, Prediction>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a build from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_weight(mut self, attribute: Attribute, weight: f64) -> Self {
        self.sort[attribute] = weight;
        self
    }

    pub fn with_minimum(mut self, attribute: Attribute, value: f64) -> Self {
        self.minimum[attribute] = value;
        self
    }

    pub fn with_maximum(mut self, attribute: Attribute, value: f64) -> Self {
        self.maximum[attribute] = value;
        self
    }

    pub fn with_build_sets(mut self, sets: impl IntoIterator<Item = RuneSet>) -> Self {
        self.build_sets.extend(sets);
        self
    }

    pub fn with_required_set(mut self, set: RuneSet) -> Self {
        self.required_sets.push(set);
        self
    }

    pub fn with_allow_broken(mut self, allow: bool) -> Self {
        self.allow_broken = allow;
        self
    }

    pub fn with_filter(mut self, tier: Tier, attribute: Attribute, filter: RuneFilter) -> Self {
        self.rune_filters
            .entry(tier)
            .or_default()
            .insert(attribute, filter);
        self
    }

    pub fn with_operator(mut self, tier: Tier, operator: FilterOperator) -> Self {
        self.rune_scoring.insert(tier, operator);
        self
    }

    pub fn with_prediction(mut self, tier: Tier, prediction: Prediction) -> Self {
        self.rune_prediction.insert(tier, prediction);
        self
    }

    pub fn with_slot_main_stats(
        mut self,
        slot: u8,
        kinds: impl IntoIterator<Item = StatKind>,
    ) -> Self {
        self.slot_main_stats
            .entry(Tier::Slot(slot))
            .or_default()
            .extend(kinds);
        self
    }

    /// Filters configured for `tier`, if any.
    pub fn tier_filters(&self, tier: Tier) -> Option<&TierFilters> {
        self.rune_filters.get(&tier)
    }

    pub fn filter(&self, tier: Tier, attribute: Attribute) -> Option<&RuneFilter> {
        self.tier_filters(tier).and_then(|f| f.get(&attribute))
    }

    pub fn operator(&self, tier: Tier) -> Option<FilterOperator> {
        self.rune_scoring.get(&tier).copied()
    }

    pub fn prediction(&self, tier: Tier) -> Option<Prediction> {
        self.rune_prediction.get(&tier).copied()
    }

    /// Allowed main stats for 1-based `slot`; empty allows any.
    pub fn main_stats_for(&self, slot: u8) -> &[StatKind] {
        self.slot_main_stats
            .get(&Tier::Slot(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Checks invariants the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (attribute, weight) in self.sort.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "sort weight for {attribute} must be a non-negative number, got {weight}"
                )));
            }
        }
        for (attribute, min) in self.minimum.non_zero() {
            let max = self.maximum[attribute];
            if !min.is_finite() || !max.is_finite() {
                return Err(invalid(format!("threshold for {attribute} is not finite")));
            }
            if max != 0.0 && min > max {
                return Err(invalid(format!(
                    "minimum {min} for {attribute} exceeds maximum {max}"
                )));
            }
        }
        for tier in self.slot_main_stats.keys() {
            if !matches!(tier, Tier::Slot(2 | 4 | 6)) {
                return Err(invalid(format!(
                    "main stat restrictions apply to slots 2, 4 and 6, not {tier}"
                )));
            }
        }
        for (tier, filters) in &self.rune_filters {
            for (attribute, filter) in filters {
                if attribute.is_derived() {
                    return Err(invalid(format!(
                        "rune filter on derived attribute {attribute} in tier {tier}"
                    )));
                }
                let parts = [filter.flat, filter.percent, filter.test];
                if parts.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(invalid(format!(
                        "rune filter {attribute} in tier {tier} must be non-negative"
                    )));
                }
            }
        }
        for (tier, operator) in &self.rune_scoring {
            if let FilterOperator::Sum(target) = operator {
                if !target.is_finite() || *target <= 0.0 {
                    return Err(invalid(format!(
                        "sum target in tier {tier} must be positive, got {target}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// How a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SearchConfig {
    /// Results to keep. Zero keeps exactly the single best and sets no
    /// result budget.
    #[serde(default)]
    pub top: usize,

    /// Wall-clock budget in seconds. Zero means no limit.
    #[serde(default)]
    pub time_limit_secs: u64,

    /// Only retain a passing loadout if it beats every retained one.
    #[serde(default)]
    pub keep_best_only: bool,

    /// Include locked runes in the candidate pools.
    #[serde(default)]
    pub include_locked: bool,

    /// Include runes equipped on other characters.
    #[serde(default)]
    pub include_equipped: bool,

    #[serde(default)]
    pub thread_count: ThreadCount,

    #[serde(default)]
    pub retention_strategy: RetentionStrategy,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    pub fn with_time_limit_secs(mut self, seconds: u64) -> Self {
        self.time_limit_secs = seconds;
        self
    }

    pub fn with_keep_best_only(mut self, keep_best_only: bool) -> Self {
        self.keep_best_only = keep_best_only;
        self
    }

    pub fn with_include_locked(mut self, include: bool) -> Self {
        self.include_locked = include;
        self
    }

    pub fn with_include_equipped(mut self, include: bool) -> Self {
        self.include_equipped = include;
        self
    }

    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_retention_strategy(mut self, strategy: RetentionStrategy) -> Self {
        self.retention_strategy = strategy;
        self
    }

    /// Returns the time limit as a Duration, if any.
    ///
    /// ```
    /// use runeforge_config::SearchConfig;
    /// use std::time::Duration;
    ///
    /// assert_eq!(SearchConfig::new().time_limit(), None);
    /// assert_eq!(
    ///     SearchConfig::new().with_time_limit_secs(3).time_limit(),
    ///     Some(Duration::from_secs(3))
    /// );
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_secs > 0).then(|| Duration::from_secs(self.time_limit_secs))
    }

    /// Number of retained loadouts that ends the search, if any.
    pub fn result_limit(&self) -> Option<usize> {
        (self.top > 0).then_some(self.top)
    }

    /// Size of the final result set.
    pub fn result_count(&self) -> usize {
        self.top.max(1)
    }
}

/// Worker thread configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Automatically determine thread count.
    #[default]
    Auto,

    /// Specific number of threads.
    Count(usize),
}

impl ThreadCount {
    /// Resolves to an actual thread count for `work_items` outer values.
    pub fn resolve(&self, work_items: usize) -> usize {
        let cap = work_items.max(1);
        match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
                .min(cap),
            ThreadCount::Count(n) => (*n).clamp(1, cap),
        }
    }
}

/// Where retained loadouts live while the search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionStrategy {
    /// Each worker keeps a private buffer; buffers merge at the end.
    #[default]
    LocalBuffers,

    /// One shared, locked container. Keep-best-only rescans it for the
    /// current maximum before every append.
    SharedScan,
}
