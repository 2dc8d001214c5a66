//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1:4000").
    pub bind_addr: String,

    /// SQLite connection URL for the snippet store.
    pub database_url: String,

    /// Root of the UI assets: templates under `html/`, files under `static/`.
    pub ui_dir: PathBuf,

    /// Whether the session cookie carries the `Secure` attribute.
    /// Off by default so plain-HTTP local development works.
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `SNIPBIN_BIND_ADDR`: Server bind address (default: "127.0.0.1:4000")
    /// - `SNIPBIN_DATABASE_URL`: SQLite URL (default: "sqlite://snipbin.db?mode=rwc")
    /// - `SNIPBIN_UI_DIR`: UI asset root (default: "./ui")
    /// - `SNIPBIN_COOKIE_SECURE`: "true" to mark the session cookie Secure (default: "false")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SNIPBIN_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".to_string());

        let database_url = std::env::var("SNIPBIN_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://snipbin.db?mode=rwc".to_string());

        let ui_dir = PathBuf::from(std::env::var("SNIPBIN_UI_DIR").unwrap_or_else(|_| "./ui".to_string()));

        let cookie_secure = std::env::var("SNIPBIN_COOKIE_SECURE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        tracing::info!(
            bind_addr = %bind_addr,
            database_url = %database_url,
            ui_dir = %ui_dir.display(),
            cookie_secure = cookie_secure,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            ui_dir,
            cookie_secure,
        })
    }

    /// Directory holding the page/layout/partial templates.
    pub fn template_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    /// Directory served under the `/static` prefix.
    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "SNIPBIN_BIND_ADDR",
        "SNIPBIN_DATABASE_URL",
        "SNIPBIN_UI_DIR",
        "SNIPBIN_COOKIE_SECURE",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "127.0.0.1:4000");
            assert_eq!(config.database_url, "sqlite://snipbin.db?mode=rwc");
            assert_eq!(config.ui_dir, PathBuf::from("./ui"));
            assert!(!config.cookie_secure);
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("SNIPBIN_BIND_ADDR", "0.0.0.0:8080"),
                ("SNIPBIN_DATABASE_URL", "sqlite::memory:"),
                ("SNIPBIN_UI_DIR", "/srv/snipbin/ui"),
                ("SNIPBIN_COOKIE_SECURE", "true"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "0.0.0.0:8080");
                assert_eq!(config.database_url, "sqlite::memory:");
                assert_eq!(config.ui_dir, PathBuf::from("/srv/snipbin/ui"));
                assert!(config.cookie_secure);
            },
        );
    }

    #[test]
    fn config_asset_subdirectories() {
        with_env_vars(&[("SNIPBIN_UI_DIR", "/srv/ui")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.template_dir(), PathBuf::from("/srv/ui/html"));
            assert_eq!(config.static_dir(), PathBuf::from("/srv/ui/static"));
        });
    }

    #[test]
    fn config_cookie_secure_flag_parsing() {
        with_env_vars(&[("SNIPBIN_COOKIE_SECURE", "1")], || {
            assert!(Config::from_env().unwrap().cookie_secure);
        });
        with_env_vars(&[("SNIPBIN_COOKIE_SECURE", "nope")], || {
            assert!(!Config::from_env().unwrap().cookie_secure);
        });
    }
}
