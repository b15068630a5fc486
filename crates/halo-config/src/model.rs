use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DATA_DIR_NAME: &str = "HaloBackOffice";

/// Stores the back office's persisted preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Offset of the business's local day from UTC, in minutes.
    #[serde(default = "Config::default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "Config::default_timeframe_value")]
    pub default_timeframe: String,
    #[serde(default = "Config::default_payroll_hours")]
    pub payroll_default_hours: Decimal,
    /// Percent applied to new invoices unless the draft overrides it.
    #[serde(default = "Config::default_tax_rate_value")]
    pub default_tax_rate: Decimal,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for record files. Defaults to the base directory.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            utc_offset_minutes: Self::default_utc_offset_minutes(),
            default_timeframe: Self::default_timeframe_value(),
            payroll_default_hours: Self::default_payroll_hours(),
            default_tax_rate: Self::default_tax_rate_value(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-PH".into()
    }

    pub fn default_currency() -> String {
        "PHP".into()
    }

    pub fn default_utc_offset_minutes() -> i32 {
        8 * 60
    }

    pub fn default_timeframe_value() -> String {
        "last30days".into()
    }

    pub fn default_payroll_hours() -> Decimal {
        Decimal::from(80)
    }

    pub fn default_tax_rate_value() -> Decimal {
        Decimal::from(12)
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// `None` when the stored minutes fall outside ±24h.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    /// Where record files live: `data_root` when set, otherwise `base` itself.
    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root.clone().unwrap_or_else(|| base.to_path_buf())
    }
}

/// `~/Documents/HaloBackOffice`, falling back to the home directory.
pub fn default_base_dir() -> PathBuf {
    let base = dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"currency": "USD"}"#).unwrap();
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.locale, "en-PH");
        assert_eq!(cfg.utc_offset_minutes, 480);
        assert_eq!(cfg.payroll_default_hours, Decimal::from(80));
        assert!(cfg.data_root.is_none());
    }

    #[test]
    fn offset_outside_a_day_is_rejected() {
        let mut cfg = Config::default();
        assert_eq!(cfg.utc_offset().map(|o| o.local_minus_utc()), Some(8 * 3600));
        cfg.utc_offset_minutes = -330;
        assert_eq!(cfg.utc_offset().map(|o| o.local_minus_utc()), Some(-330 * 60));
        cfg.utc_offset_minutes = 25 * 60;
        assert!(cfg.utc_offset().is_none());
    }

    #[test]
    fn explicit_data_root_wins() {
        let cfg = Config {
            data_root: Some(PathBuf::from("/srv/halo")),
            ..Config::default()
        };
        let base = Path::new("/home/ops/HaloBackOffice");
        assert_eq!(cfg.resolve_data_root(base), PathBuf::from("/srv/halo"));
        assert_eq!(Config::default().resolve_data_root(base), base);
        assert!(default_base_dir().ends_with(DATA_DIR_NAME));
    }
}
