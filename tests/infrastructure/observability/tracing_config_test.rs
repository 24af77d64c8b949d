use docfields::infrastructure::observability::TracingConfig;
use docfields::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_logging_settings_when_building_tracing_config_then_level_and_environment_carry_over() {
    let logging = LoggingSettings {
        level: "debug".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::from_settings(&logging, Environment::Prod);

    assert_eq!(config.level, "debug");
    assert_eq!(config.environment, "prod");
    assert!(config.json_format);
}
