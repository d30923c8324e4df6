//! Tests for run configuration.

use super::*;

#[test]
fn empty_document_is_all_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.controller.first_iteration, 0);
    assert_eq!(config.controller.last_iteration, 10);
    assert!(config.controller.dump_data_at_end);
    assert!(!config.transit.use_transit);
    assert_eq!(config.mobsim.end_time, 108_000);
    assert_eq!(config.global.random_seed, 4711);
}

#[test]
fn toml_parsing() {
    let toml = r#"
        [controller]
        output_directory = "out/x"
        overwrite_files = "delete_directory_if_exists"
        first_iteration = 2
        last_iteration = 5
        dump_data_at_end = false

        [scenario]
        use_households = true

        [transit]
        use_transit = true
        vehicles_file = "transitVehicles.xml"

        [scoring]
        learning_rate = 0.5

        [scoring.mode_params.car]
        marginal_utility_of_traveling_utils_hr = -3.0

        [[scoring.activity_params]]
        activity_type = "work"
        typical_duration = 28800.0
        opening_time = 25200.0
        closing_time = 64800.0

        [replanning]
        max_agent_plan_memory_size = 3

        [[replanning.strategies]]
        name = "best_score"
        weight = 1.0
    "#;

    let config = Config::from_toml_str(toml).unwrap();
    assert_eq!(config.controller.output_directory, std::path::PathBuf::from("out/x"));
    assert_eq!(config.controller.overwrite_files, OverwriteFileSetting::DeleteDirectoryIfExists);
    assert_eq!(config.controller.first_iteration, 2);
    assert!(!config.controller.dump_data_at_end);
    assert!(config.scenario.use_households);
    assert!(!config.scenario.use_vehicles);
    assert!(config.transit.vehicles_file.is_some());
    assert_eq!(config.scoring.learning_rate, 0.5);
    assert_eq!(config.scoring.traveling_utils_hr("car"), -3.0);
    let work = config.scoring.activity_params("work").unwrap();
    assert_eq!(work.opening_time, Some(25_200.0));
    assert_eq!(config.replanning.strategies, vec![StrategySettings::new("best_score", 1.0)]);
}

#[test]
fn toml_round_trip_keeps_injected_params() {
    let mut config = Config::new().with_iterations(0, 2).with_random_seed(9);
    config.scoring.add_activity_params(
        ActivityParams::new(TRANSIT_ACTIVITY_TYPE, 120.0)
            .with_opening_time(0.0)
            .with_closing_time(0.0),
    );
    let text = config.to_toml_string().unwrap();
    let back = Config::from_toml_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[controller]\nlast_iteration = 1\n").unwrap();
    let config = Config::from_toml_file(&path).unwrap();
    assert_eq!(config.controller.last_iteration, 1);

    assert!(matches!(
        Config::from_toml_file(dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn malformed_toml_is_an_error() {
    let err = Config::from_toml_str("[controller]\nlast_iteration = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[cfg(test)]
mod activity_params {
    use super::*;

    #[test]
    fn add_keeps_existing_entry() {
        let mut scoring = ScoringConfig::default();
        assert!(scoring.add_activity_params(ActivityParams::new("home", 43_200.0)));
        assert!(!scoring.add_activity_params(ActivityParams::new("home", 1.0)));
        assert_eq!(scoring.activity_params("home").unwrap().typical_duration, 43_200.0);
        assert_eq!(scoring.all_activity_params().len(), 1);
    }

    #[test]
    fn zero_window_is_not_scored() {
        let pt = ActivityParams::new(TRANSIT_ACTIVITY_TYPE, 120.0)
            .with_opening_time(0.0)
            .with_closing_time(0.0);
        assert!(!pt.scores_at_all());
        assert!(ActivityParams::new("home", 1.0).scores_at_all());
        assert!(ActivityParams::new("shop", 1.0).with_opening_time(0.0).scores_at_all());
    }

    #[test]
    fn unknown_mode_falls_back_to_default_utility() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.traveling_utils_hr("hovercraft"), -6.0);
        assert_eq!(scoring.traveling_utils_hr("walk"), -12.0);
    }
}

#[cfg(test)]
mod intervals {
    use super::*;

    #[test]
    fn first_iteration_and_multiples_are_due() {
        let c = ControllerConfig { first_iteration: 1, write_plans_interval: 5, ..Default::default() };
        assert!(c.writes_plans(1));
        assert!(!c.writes_plans(2));
        assert!(c.writes_plans(5));
        assert!(c.writes_plans(10));
    }

    #[test]
    fn zero_interval_disables() {
        let c = ControllerConfig { write_events_interval: 0, ..Default::default() };
        assert!(!c.writes_events(0));
        assert!(!c.writes_events(10));
    }
}
