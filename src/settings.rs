//! Simulation settings
//!
//! Loaded from a JSON file; every field falls back to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CONTACTS_PER_TICK, REPORT_INTERVAL, SIM_DT};

/// How a ball's contacts with several walls in one tick are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactOrder {
    /// Bounce off the wall hit first, then re-sweep the rest of the tick
    #[default]
    Earliest,
    /// Scan walls in order, bouncing off each hit; the last hit wins
    ScanOrder,
}

impl ContactOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactOrder::Earliest => "earliest",
            ContactOrder::ScanOrder => "scan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "earliest" => Some(ContactOrder::Earliest),
            "scan" | "scan_order" | "legacy" => Some(ContactOrder::ScanOrder),
            _ => None,
        }
    }
}

/// Per-call collision options handed to the tick driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionRules {
    /// Also collide with wall endpoints, not just wall interiors
    pub check_edges: bool,
    pub contact_order: ContactOrder,
    /// Cap on contacts per ball per tick (Earliest only)
    pub max_contacts_per_tick: u32,
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self {
            check_edges: true,
            contact_order: ContactOrder::Earliest,
            max_contacts_per_tick: MAX_CONTACTS_PER_TICK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: CollisionRules,
    /// Fixed timestep in seconds
    pub sim_dt: f32,
    /// Ticks between position reports
    pub report_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: CollisionRules::default(),
            sim_dt: SIM_DT,
            report_interval: REPORT_INTERVAL,
        }
    }
}

impl Settings {
    /// Scan-order contacts, matching the legacy cage driver
    pub fn legacy() -> Self {
        let mut settings = Self::default();
        settings.rules.contact_order = ContactOrder::ScanOrder;
        settings
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Timestep to run with (falls back to the default if the configured one is unusable)
    pub fn effective_dt(&self) -> f32 {
        if self.sim_dt.is_finite() && self.sim_dt > 0.0 {
            self.sim_dt
        } else {
            SIM_DT
        }
    }

    /// Load settings from a JSON file, using defaults if it can't be read
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Invalid settings in {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_order_names() {
        for order in [ContactOrder::Earliest, ContactOrder::ScanOrder] {
            assert_eq!(ContactOrder::from_str(order.as_str()), Some(order));
        }
        assert_eq!(ContactOrder::from_str("Legacy"), Some(ContactOrder::ScanOrder));
        assert_eq!(ContactOrder::from_str("random"), None);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::legacy();
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"scan_order\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = Settings::from_json(r#"{ "rules": { "check_edges": false } }"#).unwrap();
        assert!(!settings.rules.check_edges);
        assert_eq!(settings.rules.contact_order, ContactOrder::Earliest);
        assert_eq!(settings.rules.max_contacts_per_tick, MAX_CONTACTS_PER_TICK);
        assert_eq!(settings.sim_dt, SIM_DT);
    }

    #[test]
    fn test_effective_dt() {
        let mut settings = Settings::default();
        settings.sim_dt = 0.0;
        assert_eq!(settings.effective_dt(), SIM_DT);
        settings.sim_dt = 0.01;
        assert_eq!(settings.effective_dt(), 0.01);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/cage/settings.json"));
        assert_eq!(settings, Settings::default());
    }
}
