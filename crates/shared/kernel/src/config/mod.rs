use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Environment variables with this prefix override file settings.
pub const ENV_PREFIX: &str = "BINDERY";

/// Custom error type for config loading.
#[bindery_derive::bindery_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File** (optional): Loads settings from a file (e.g., `bindery.toml`). The format is
///    inferred from the extension. When no path is given, only defaults and the environment apply.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `BINDERY__`.
///    Nested structures are accessed using double underscores (e.g., `BINDERY__LOGGING__LEVEL` maps
///    to `logging.level`).
///
/// # Type Parameters
/// * `T`: The target configuration structure. Must implement [`serde::Deserialize`]; fields
///   missing from every source fall back to the structure's serde defaults.
///
/// # Errors
/// This function will return an error if:
/// * A path was given and the file cannot be found or parsed.
/// * The merged values do not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use bindery_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        let path: &Path = path.as_ref();
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_domain::config::AppConfig;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn missing_file_is_an_error() {
        let result = load_config::<AppConfig>(Some("/definitely/not/here.toml"));
        let err = result.expect_err("missing file must fail");
        assert_eq!(err.code(), "config");
        assert!(err.to_string().contains("Failed to build config"));
    }

    #[test]
    #[serial]
    fn no_path_yields_defaults() {
        let cfg: AppConfig = load_config(None::<&str>).expect("defaults");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.catalog.currency, "EUR");
    }

    #[test]
    #[serial]
    fn file_values_are_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
        writeln!(file, "[logging]\nlevel = \"debug\"\n\n[catalog]\ncurrency = \"ARS\"")
            .expect("write config");

        let cfg: AppConfig = load_config(Some(file.path())).expect("config loads");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.catalog.currency, "ARS");
        assert!(cfg.logging.console);
    }
}
