use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `CAMPUS__DATABASE__URL`.
pub const ENV_PREFIX: &str = "CAMPUS";
const DEFAULT_FILE: &str = "server";

#[campus_derive::campus_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file, then `CAMPUS__`-prefixed environment overrides.
///
/// 1. **Base File**: the given path (any format the `config` crate detects from
///    the extension, or the extension may be omitted). An explicit path must
///    exist. Without one, an optional `server.*` file in the working directory is used.
/// 2. **Environment Overrides**: nested keys are separated by double
///    underscores, so `CAMPUS__DATABASE__URL` maps to `database.url`.
///
/// # Errors
/// Returns an error if an explicit file is missing, or if the merged values do
/// not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use campus_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_FILE), |p| p.as_ref().to_path_buf());

    info!(path = %effective_path.display(), required, "Loading config");

    load_layers(&effective_path, required, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .convert_case(config::Case::Snake)
        .try_parsing(true)
}

fn load_layers<T>(path: &Path, required: bool, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ApiConfig;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        environment().source(Some(map))
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg: ApiConfig =
            load_layers(&dir.path().join("server"), false, env_from(&[])).expect("defaults");

        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.url, "mem://");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_config::<ApiConfig>(Some(dir.path().join("absent.toml")))
            .expect_err("file is required");
        assert!(matches!(err, ConfigError::Config { .. }));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "[server]\nport = 8080\n\n[database]\nseed = true\nnamespace = \"school\"")
            .expect("write");

        let cfg: ApiConfig = load_layers(
            &path,
            true,
            env_from(&[("CAMPUS__SERVER__PORT", "9090"), ("CAMPUS__REPORT__DATA_FILE", "x.csv")]),
        )
        .expect("config");

        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.database.seed);
        assert_eq!(cfg.database.namespace, "school");
        assert_eq!(cfg.report.data_file, PathBuf::from("x.csv"));
    }
}
