use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::GatewayError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Transport the gateway speaks MCP over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Stdio,
    Server,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Stdio => f.write_str("stdio"),
            Mode::Server => f.write_str("server"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdio" => Ok(Mode::Stdio),
            "server" => Ok(Mode::Server),
            other => Err(GatewayError::Config(format!(
                "invalid MODE: {other}. Must be 'server' or 'stdio'"
            ))),
        }
    }
}

/// Settings for the EMI calculation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Process configuration. Read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub port: u16,
    pub deprecate_rest: bool,
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    backend: FileBackend,
}

#[derive(Debug, Default, Deserialize)]
struct FileBackend {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Build from the environment, layering `EMI_CONFIG` (TOML) underneath.
    /// A `.env` file is loaded first; variables already set in the process win.
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let file = match non_empty_env("EMI_CONFIG") {
            Some(path) => load_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let mode = match non_empty_env("MODE") {
            Some(m) => m.parse()?,
            None => Mode::Stdio,
        };
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if mode == Mode::Server && port == 0 {
            return Err(GatewayError::Config("PORT cannot be 0".into()));
        }
        let deprecate_rest = std::env::var("DEPRECATE_REST")
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        let base_url = non_empty_env("EMI_API_BASE_URL")
            .or(file.backend.base_url.filter(|b| !b.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = non_empty_env("EMI_API_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.backend.timeout_secs)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            mode,
            port,
            deprecate_rest,
            backend: BackendConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn load_file(path: &Path) -> Result<FileConfig, GatewayError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("reading {}: {e}", path.display())))?;
    toml::from_str(&raw).map_err(|e| GatewayError::Config(format!("parsing {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "MODE",
            "PORT",
            "DEPRECATE_REST",
            "EMI_API_BASE_URL",
            "EMI_API_TIMEOUT_SECS",
            "EMI_CONFIG",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_stdio_and_local_backend() {
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.mode, Mode::Stdio);
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.deprecate_rest);
        assert_eq!(cfg.backend.base_url, "http://localhost:8000/api");
        assert_eq!(cfg.backend.timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn parses_env_overrides() {
        clear_env();
        std::env::set_var("MODE", "server");
        std::env::set_var("PORT", "9090");
        std::env::set_var("DEPRECATE_REST", "1");
        std::env::set_var("EMI_API_BASE_URL", "http://emi.internal/api");
        std::env::set_var("EMI_API_TIMEOUT_SECS", "3");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.mode, Mode::Server);
        assert_eq!(cfg.port, 9090);
        assert!(cfg.deprecate_rest);
        assert_eq!(cfg.backend.base_url, "http://emi.internal/api");
        assert_eq!(cfg.backend.timeout, Duration::from_secs(3));
        clear_env();
    }

    #[test]
    #[serial]
    fn empty_base_url_falls_back_to_default() {
        clear_env();
        std::env::set_var("EMI_API_BASE_URL", "   ");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.backend.base_url, DEFAULT_BASE_URL);
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unknown_mode() {
        clear_env();
        std::env::set_var("MODE", "invalid");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("invalid MODE"));
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_port_zero_in_server_mode() {
        clear_env();
        std::env::set_var("MODE", "server");
        std::env::set_var("PORT", "0");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PORT cannot be 0"));
        clear_env();
    }

    #[test]
    #[serial]
    fn toml_file_is_layered_under_env() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nbase_url = \"http://from-file/api\"\ntimeout_secs = 4"
        )
        .unwrap();
        std::env::set_var("EMI_CONFIG", file.path());

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.backend.base_url, "http://from-file/api");
        assert_eq!(cfg.backend.timeout, Duration::from_secs(4));

        std::env::set_var("EMI_API_BASE_URL", "http://from-env/api");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.backend.base_url, "http://from-env/api");
        assert_eq!(cfg.backend.timeout, Duration::from_secs(4));
        clear_env();
    }

    /// Run `f` with the working directory switched to a fresh dir holding `contents` as `.env`.
    fn with_dotenv<T>(contents: &str, f: impl FnOnce() -> T) -> T {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), contents).unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let out = f();
        std::env::set_current_dir(prev).unwrap();
        out
    }

    #[test]
    #[serial]
    fn dotenv_file_supplies_base_url() {
        clear_env();
        let cfg = with_dotenv("EMI_API_BASE_URL=http://from-dotenv/api\n", || Config::from_env().unwrap());
        assert_eq!(cfg.backend.base_url, "http://from-dotenv/api");
        clear_env();
    }

    #[test]
    #[serial]
    fn process_env_wins_over_dotenv_file() {
        clear_env();
        std::env::set_var("EMI_API_BASE_URL", "http://from-process/api");
        let cfg = with_dotenv("EMI_API_BASE_URL=http://from-dotenv/api\n", || Config::from_env().unwrap());
        assert_eq!(cfg.backend.base_url, "http://from-process/api");
        clear_env();
    }

    #[test]
    #[serial]
    fn unreadable_config_file_is_an_error() {
        clear_env();
        std::env::set_var("EMI_CONFIG", "/nonexistent/emi.toml");
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
