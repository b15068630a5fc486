use std::{thread, time::Duration};

use halo_config::{Config, ConfigManager};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn default_config_targets_the_philippine_office() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "PHP");
    assert_eq!(cfg.locale, "en-PH");
    assert_eq!(cfg.default_timeframe, "last30days");
    assert_eq!(cfg.default_tax_rate, dec!(12));
    assert!(cfg.ui_color_enabled);
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert!(manager.backups_dir().exists());
    assert!(!manager.config_path().exists());
    assert_eq!(manager.load().expect("load config"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let cfg = Config {
        currency: "USD".into(),
        utc_offset_minutes: -300,
        payroll_default_hours: dec!(86.5),
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn backups_list_newest_first_and_restore() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let original = Config::default();
    let first = manager.backup(&original, None).expect("first backup");
    thread::sleep(Duration::from_millis(1100));
    let changed = Config {
        default_timeframe: "ytd".into(),
        ..Config::default()
    };
    let second = manager
        .backup(&changed, Some("Before year end"))
        .expect("second backup");
    assert!(second.starts_with("config_before-year-end_"));

    let backups = manager.list_backups().expect("list backups");
    assert_eq!(backups, vec![second.clone(), first.clone()]);

    let restored = manager.restore(&first).expect("restore");
    assert_eq!(restored, original);
    assert_eq!(manager.load().expect("load"), original);

    assert!(manager.restore("config_missing.json").is_err());
}
