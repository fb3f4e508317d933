use bracket_engine::LayoutConfig;
use log::{LevelFilter, warn};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REFRESH_SECS: u64 = 30;
const CARD_SIZE_RANGE: RangeInclusive<f64> = 1.0..=512.0;
const GAP_RANGE: RangeInclusive<f64> = 0.0..=512.0;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// File path or URL of the bracket snapshot.
    pub source: Option<String>,
    pub refresh_interval: Duration,
    pub layout: LayoutConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            source: None,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            layout: LayoutConfig::default(),
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `KNOCKOUT_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let source = lookup("KNOCKOUT_SOURCE").filter(|s| !s.trim().is_empty());
        let log_level = lookup("KNOCKOUT_LOG").and_then(|s| LevelFilter::from_str(s.trim()).ok());

        let refresh_secs = parse_or(&lookup, "KNOCKOUT_REFRESH_SECS", DEFAULT_REFRESH_SECS).max(1);
        let layout = LayoutConfig {
            card_height: parse_in(&lookup, "KNOCKOUT_CARD_HEIGHT", defaults.layout.card_height, CARD_SIZE_RANGE),
            base_gap: parse_in(&lookup, "KNOCKOUT_BASE_GAP", defaults.layout.base_gap, GAP_RANGE),
            card_width: parse_in(&lookup, "KNOCKOUT_CARD_WIDTH", defaults.layout.card_width, CARD_SIZE_RANGE),
            connector_width: parse_in(
                &lookup,
                "KNOCKOUT_CONNECTOR_WIDTH",
                defaults.layout.connector_width,
                CARD_SIZE_RANGE,
            ),
        };

        Self {
            source,
            log_level,
            refresh_interval: Duration::from_secs(refresh_secs),
            layout,
            ..defaults
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    parse_checked(lookup, key, default, |_| true)
}

/// Like [`parse_or`], but values outside `range` (including NaN) fall back too.
fn parse_in(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64, range: RangeInclusive<f64>) -> f64 {
    parse_checked(lookup, key, default, |v| range.contains(v))
}

fn parse_checked<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    accept: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) if accept(&v) => v,
        _ => {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }
    }
}
