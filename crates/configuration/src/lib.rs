use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, DashboardSettings, DataSettings, LogFormat, LoggingSettings};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tradelens";
/// Prefix for environment overrides, e.g. `TRADELENS__DASHBOARD__STARTING_BALANCE`.
pub const ENV_PREFIX: &str = "TRADELENS";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning:
/// 1. Built-in defaults.
/// 2. The given TOML file (required), or `tradelens.toml` if present.
/// 3. Environment variables prefixed with `TRADELENS__`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::default();
        assert_eq!(config.dashboard.starting_balance, dec!(25000));
        assert_eq!(config.dashboard.smoothing_points, 10_000);
        assert_eq!(config.dashboard.histogram_bins, 30);
        assert_eq!(config.data.timestamp_format, "%d/%m/%Y %H:%M");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_overrides_only_what_it_sets() {
        let file = write_config(
            r#"
            [dashboard]
            starting_balance = "10000.50"
            currency_symbol = "$"

            [logging]
            format = "json"
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.dashboard.starting_balance, dec!(10000.50));
        assert_eq!(config.dashboard.currency_symbol, "$");
        assert_eq!(config.dashboard.histogram_bins, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.data.path, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/tradelens.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let file = write_config(
            r#"
            [dashboard]
            starting_balance = "0"
            "#,
        );
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.dashboard.histogram_bins = 0;
        assert!(config.validate().is_err());
    }
}
