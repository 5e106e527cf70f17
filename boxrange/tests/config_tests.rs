use boxrange::{BearBoxConfig, BoxProfileConfig, BullBoxConfig};

#[test]
fn defaults_match_detector_constants() {
    let bear = BearBoxConfig::default();
    assert_eq!(bear.rise_threshold, 5.0);
    assert_eq!(bear.break_threshold, 2.0);
    assert_eq!(bear.min_duration_days, 1);
    assert_eq!(bear.max_duration_days, 420);
    assert_eq!(bear.min_drop_from_prev_high, 3.0);

    let bull = BullBoxConfig::default();
    assert_eq!(bull.min_days_from_peak, 420);
    assert_eq!(bull.drop_threshold, 5.0);
    assert_eq!(bull.break_threshold, 2.0);
    assert_eq!(bull.min_duration_days, 1);
    assert_eq!(bull.lookback_days, 10);
}

#[test]
fn yaml_overrides_only_given_fields() {
    let bear = BearBoxConfig::from_yaml_str("rise_threshold: 7.5\nmax_duration_days: 365\n")
        .expect("valid yaml");
    assert_eq!(bear.rise_threshold, 7.5);
    assert_eq!(bear.max_duration_days, 365);
    assert_eq!(bear.break_threshold, 2.0);

    let bull = BullBoxConfig::from_yaml_str("lookback_days: 5\n").expect("valid yaml");
    assert_eq!(bull.lookback_days, 5);
    assert_eq!(bull.drop_threshold, 5.0);
}

#[test]
fn profile_resolves_default_then_cycle_override() {
    let yaml = r#"
default:
  bear:
    rise_threshold: 6.0
  bull:
    drop_threshold: 4.0
cycle:
  "4":
    bear:
      break_threshold: 3.0
    bull:
      drop_threshold: 8.0
"#;
    let profile = BoxProfileConfig::from_yaml_str(yaml).expect("valid yaml");

    let (bear, bull) = profile.resolve_for(2);
    assert_eq!(bear.rise_threshold, 6.0);
    assert_eq!(bear.break_threshold, 2.0);
    assert_eq!(bull.drop_threshold, 4.0);

    let (bear, bull) = profile.resolve_for(4);
    assert_eq!(bear.rise_threshold, 6.0);
    assert_eq!(bear.break_threshold, 3.0);
    assert_eq!(bull.drop_threshold, 8.0);
    assert_eq!(bull.lookback_days, 10);
}

#[test]
fn empty_profile_resolves_to_defaults() {
    let (bear, bull) = BoxProfileConfig::default().resolve_for(1);
    assert_eq!(bear, BearBoxConfig::default());
    assert_eq!(bull, BullBoxConfig::default());
}

#[test]
fn profile_loads_from_file() {
    let path = std::env::temp_dir().join("boxrange_profile_test.yaml");
    std::fs::write(&path, "default:\n  bear:\n    min_duration_days: 14\n").expect("write yaml");

    let profile = BoxProfileConfig::from_yaml_file(&path).expect("load yaml");
    let (bear, _) = profile.resolve_for(3);
    assert_eq!(bear.min_duration_days, 14);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_profile_file_is_an_error() {
    let path = std::env::temp_dir().join("boxrange_profile_missing.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(BoxProfileConfig::from_yaml_file(&path).is_err());
}
