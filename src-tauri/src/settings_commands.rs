//! Settings Tauri commands: Gemini API key management.
//!
//! Handles:
//! - Checking whether a key is configured (env var or keychain)
//! - Saving a key to the OS keychain
//! - Testing the key with a minimal request

use crate::config::{self, GeminiConfig};

/// Tauri command: is a Gemini API key available?
#[tauri::command]
pub fn has_api_key() -> bool {
    config::resolve_api_key().is_some()
}

/// Tauri command: save the Gemini API key to the OS keychain.
#[tauri::command]
pub fn save_api_key(api_key: String) -> Result<(), String> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err("API key is empty".to_string());
    }
    config::save_api_key(api_key)?;
    log::info!("[SETTINGS] API key saved");
    Ok(())
}

/// Tauri command: test the configured key.
///
/// Sends a minimal request without search grounding and checks the status.
#[tauri::command]
pub async fn test_connection() -> Result<bool, String> {
    let config = GeminiConfig::from_env().map_err(|e| e.to_string())?;

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| e.to_string())?;
    let resp = client
        .post(config.endpoint())
        .header("x-goog-api-key", &config.api_key)
        .json(&serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "Reply with just: ok"}]}],
            "generationConfig": {"maxOutputTokens": 50}
        }))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let ok = resp.status().is_success();
    log::info!("[SETTINGS] Test gemini ({}) status: {}", config.model, resp.status());
    Ok(ok)
}
