//! Runtime configuration: env files, API key resolution, Gemini endpoint.
//!
//! Priority for the API key:
//! 1. `GEMINI_API_KEY`
//! 2. `API_KEY`
//! 3. OS keychain entry saved from the settings panel
//!
//! A key found in the keychain is copied into `GEMINI_API_KEY` so later
//! lookups in the same session skip the keychain.

use std::path::Path;
use std::time::Duration;

use crate::llm::error::IdentifyError;
use crate::llm::prompts::MODEL;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";
pub const KEYRING_SERVICE: &str = "font-detective";
pub const KEYRING_USER: &str = "gemini";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Load `.env.local`, falling back to `.env`, from `root`. First file found wins.
pub fn load_env_files(root: &Path) {
    for env_file in [".env.local", ".env"] {
        let path = root.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => log::info!("[CONFIG] Loaded {}", path.display()),
                Err(e) => log::warn!("[CONFIG] Failed to load {}: {}", path.display(), e),
            }
            return;
        }
    }
}

/// Find the Gemini API key (env vars, then keychain).
pub fn resolve_api_key() -> Option<String> {
    resolve_api_key_with(process_env, keychain_api_key)
}

/// Key resolution over explicit sources. The keychain is only consulted
/// when no env var holds a non-empty key.
pub fn resolve_api_key_with(
    env: impl Fn(&str) -> Option<String>,
    keychain: impl FnOnce() -> Option<String>,
) -> Option<String> {
    [API_KEY_ENV, LEGACY_API_KEY_ENV]
        .into_iter()
        .find_map(|var| env(var).filter(|key| !key.is_empty()))
        .or_else(keychain)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn keychain_api_key() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            std::env::set_var(API_KEY_ENV, &key);
            log::info!("[CONFIG] Loaded Gemini key from OS keychain");
            Some(key)
        }
        _ => None,
    }
}

/// Store the key in the OS keychain and in the current environment.
pub fn save_api_key(api_key: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .map_err(|e| format!("Keyring error: {}", e))?;
    entry
        .set_password(api_key)
        .map_err(|e| format!("Failed to save key: {}", e))?;
    std::env::set_var(API_KEY_ENV, api_key);
    log::info!("[CONFIG] Gemini API key saved");
    Ok(())
}

/// Everything the Gemini client needs for one call.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Resolve from the environment. Fails fast when no key is available.
    ///
    /// Optional overrides: `GEMINI_MODEL`, `GEMINI_BASE_URL`, `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, IdentifyError> {
        Self::from_lookup(process_env, keychain_api_key)
    }

    /// Same as `from_env`, reading variables through `env` and the stored
    /// key through `keychain`.
    pub fn from_lookup(
        env: impl Fn(&str) -> Option<String>,
        keychain: impl FnOnce() -> Option<String>,
    ) -> Result<Self, IdentifyError> {
        let api_key = resolve_api_key_with(&env, keychain).ok_or_else(|| {
            IdentifyError::Configuration(format!(
                "{} is not set. Add your Gemini API key in Settings.",
                API_KEY_ENV
            ))
        })?;

        let non_empty = |name: &str| env(name).filter(|v| !v.is_empty());
        let mut config = Self::new(api_key);
        if let Some(model) = non_empty("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = non_empty("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = non_empty("GEMINI_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                IdentifyError::Configuration(format!("Invalid GEMINI_TIMEOUT_SECS: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_public_endpoint() {
        let config = GeminiConfig::new("k");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = GeminiConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<12 chars>"));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_key_fails_fast_with_configuration_error() {
        let keychain_asked = Cell::new(false);
        let err = GeminiConfig::from_lookup(vars(&[("GEMINI_API_KEY", ""), ("API_KEY", "")]), || {
            keychain_asked.set(true);
            None
        })
        .unwrap_err();

        assert!(keychain_asked.get());
        assert!(matches!(err, IdentifyError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "GEMINI_API_KEY is not set. Add your Gemini API key in Settings."
        );
    }

    #[test]
    fn env_key_wins_and_skips_keychain() {
        let keychain_asked = Cell::new(false);
        let key = resolve_api_key_with(vars(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "legacy")]), || {
            keychain_asked.set(true);
            Some("stored".to_string())
        });
        assert_eq!(key.as_deref(), Some("primary"));
        assert!(!keychain_asked.get());

        let key = resolve_api_key_with(vars(&[("GEMINI_API_KEY", ""), ("API_KEY", "legacy")]), || None);
        assert_eq!(key.as_deref(), Some("legacy"));
    }

    #[test]
    fn keychain_is_the_last_resort() {
        let key = resolve_api_key_with(vars(&[]), || Some("stored".to_string()));
        assert_eq!(key.as_deref(), Some("stored"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = GeminiConfig::from_lookup(
            vars(&[
                ("GEMINI_API_KEY", "k"),
                ("GEMINI_MODEL", "gemini-2.5-pro"),
                ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
                ("GEMINI_TIMEOUT_SECS", "5"),
            ]),
            || None,
        )
        .unwrap();
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-pro:generateContent"
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_a_configuration_error() {
        let err = GeminiConfig::from_lookup(
            vars(&[("GEMINI_API_KEY", "k"), ("GEMINI_TIMEOUT_SECS", "soon")]),
            || None,
        )
        .unwrap_err();
        assert!(matches!(err, IdentifyError::Configuration(_)));
    }

    #[test]
    fn load_env_files_ignores_missing_files() {
        load_env_files(Path::new("/nonexistent/font-detective"));
    }
}
