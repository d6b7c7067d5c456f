use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Where the CLI persists and reloads the state snapshot
    pub snapshot_path: String,
}

/// Tunable booking policy. Everything time-based is expressed in whole
/// hours/minutes to match how operations teams reason about the rules.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// How long a pending reservation holds its seat
    #[serde(default = "default_hold_hours")]
    pub hold_hours: i64,
    /// Extra slack before the sweeper touches an expired hold
    #[serde(default = "default_grace_hours")]
    pub sweep_grace_hours: i64,
    /// Cancelling strictly more than this many hours before departure
    /// earns the early refund tier
    #[serde(default = "default_refund_window_hours")]
    pub refund_window_hours: i64,
    #[serde(default = "default_refund_early_pct")]
    pub refund_early_pct: i64,
    #[serde(default = "default_refund_late_pct")]
    pub refund_late_pct: i64,
    /// Boarding time printed on tickets, minutes before departure
    #[serde(default = "default_boarding_lead_minutes")]
    pub boarding_lead_minutes: i64,
}

fn default_hold_hours() -> i64 {
    24
}

fn default_grace_hours() -> i64 {
    1
}

fn default_refund_window_hours() -> i64 {
    24
}

fn default_refund_early_pct() -> i64 {
    80
}

fn default_refund_late_pct() -> i64 {
    50
}

fn default_boarding_lead_minutes() -> i64 {
    60
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            hold_hours: default_hold_hours(),
            sweep_grace_hours: default_grace_hours(),
            refund_window_hours: default_refund_window_hours(),
            refund_early_pct: default_refund_early_pct(),
            refund_late_pct: default_refund_late_pct(),
            boarding_lead_minutes: default_boarding_lead_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                snapshot_path: "aerovia-state.json".to_string(),
            },
            business_rules: BusinessRules::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // AEROVIA__BUSINESS_RULES__HOLD_HOURS=48 etc.
            .add_source(config::Environment::with_prefix("AEROVIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
