//! Tauri command handlers for the main window.
//!
//! Thin wrappers that bridge frontend invoke() calls to the shell.
//! Every state-changing command returns a fresh `ShellSnapshot` so the
//! page can redraw from a single source of truth.

use std::path::PathBuf;

use tauri::Emitter;
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_shell::ShellExt;

use crate::glyph::{self, GeneratedGlyph, GlyphMap};
use crate::llm::prompts::SAMPLE_PROMPTS;
use crate::llm::GeminiClient;
use crate::shell::{self, ShellSnapshot};
use crate::upload::{self, UploadError, UploadedFile};
use crate::AppState;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Put a finished upload (or its rejection) into the shell.
fn apply_upload(state: &AppState, upload: Result<UploadedFile, UploadError>) -> ShellSnapshot {
    let mut shell = state.shell();
    match upload {
        Ok(file) => shell.set_upload(file),
        Err(e) => shell.reject_upload(&e),
    }
    shell.snapshot()
}

/// Tauri command: current page state. Called by the window on load.
#[tauri::command]
pub fn get_app_state(state: tauri::State<'_, AppState>) -> ShellSnapshot {
    state.snapshot()
}

/// Tauri command: store the prompt as the user types.
#[tauri::command]
pub fn set_prompt(state: tauri::State<'_, AppState>, prompt: String) {
    state.shell().set_prompt(prompt);
}

/// Tauri command: the fixed list of sample prompts.
#[tauri::command]
pub fn get_sample_prompts() -> Vec<&'static str> {
    SAMPLE_PROMPTS.to_vec()
}

/// Tauri command: open the native file picker and load the chosen image.
///
/// Cancelling the dialog leaves the current upload untouched. The dialog
/// answers through a callback so no runtime worker waits on it.
#[tauri::command]
pub async fn pick_image(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<ShellSnapshot, String> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file(move |picked| {
            let _ = tx.send(picked);
        });
    let picked = rx.await.map_err(|e| e.to_string())?;

    let Some(file_path) = picked else {
        log::info!("[UPLOAD] Picker cancelled");
        return Ok(state.snapshot());
    };
    let path = file_path.into_path().map_err(|e| e.to_string())?;
    let loaded = upload::load_image(&path).await;
    Ok(apply_upload(&state, loaded))
}

/// Tauri command: load an image from a path (file dropped on the window).
#[tauri::command]
pub async fn load_image(
    state: tauri::State<'_, AppState>,
    path: String,
) -> Result<ShellSnapshot, String> {
    let loaded = upload::load_image(&PathBuf::from(path)).await;
    Ok(apply_upload(&state, loaded))
}

/// Tauri command: accept image data read by the webview (drag-and-drop, paste).
#[tauri::command]
pub fn upload_image_data(
    state: tauri::State<'_, AppState>,
    file_name: String,
    mime_type: Option<String>,
    data: String,
) -> ShellSnapshot {
    let encoded = upload::encode_base64_image(&file_name, &data, mime_type.as_deref());
    apply_upload(&state, encoded)
}

/// Tauri command: remove the current image.
#[tauri::command]
pub fn clear_image(state: tauri::State<'_, AppState>) -> ShellSnapshot {
    let mut shell = state.shell();
    shell.clear_upload();
    shell.snapshot()
}

/// Tauri command: identify the font from the current prompt and image.
///
/// A second call while one is in flight is rejected by the shell.
/// Validation failures are not errors: they come back as a snapshot with
/// an inline notice.
#[tauri::command]
pub async fn identify_font(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    custom_prompt: Option<String>,
) -> Result<ShellSnapshot, String> {
    state
        .identify_with(custom_prompt.as_deref(), GeminiClient::from_env, |snap| {
            let _ = app.emit("shell-updated", snap);
        })
        .await
        .map_err(|e| e.to_string())
}

/// Tauri command: fill in a sample prompt and submit it immediately.
#[tauri::command]
pub async fn submit_sample_prompt(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    index: usize,
) -> Result<ShellSnapshot, String> {
    let prompt = shell::sample_prompt(index).map_err(|e| e.to_string())?;
    identify_font(app, state, Some(prompt.to_string())).await
}

/// Tauri command: close the result or error panel.
#[tauri::command]
pub fn dismiss_result(state: tauri::State<'_, AppState>) -> ShellSnapshot {
    let mut shell = state.shell();
    shell.dismiss();
    shell.snapshot()
}

/// Tauri command: open a source link in the system browser.
///
/// Only http(s) links are opened.
#[tauri::command]
#[allow(deprecated)]
pub fn open_source(app: tauri::AppHandle, uri: String) -> Result<(), String> {
    if !(uri.starts_with("https://") || uri.starts_with("http://")) {
        return Err(format!("Refusing to open non-web link: {}", uri));
    }
    app.shell().open(&uri, None).map_err(|e| e.to_string())?;
    log::info!("[ACTION] Opened source: {}", uri);
    Ok(())
}

/// Tauri command: render a text preview with the given glyphs as SVG.
#[tauri::command]
pub fn render_text_preview(text: String, glyphs: Vec<GeneratedGlyph>) -> String {
    let map = GlyphMap::from_glyphs(glyphs);
    glyph::render_preview(&text, &map)
}

/// Tauri command: render each glyph as its own SVG cell, in input order.
#[tauri::command]
pub fn render_glyph_grid(glyphs: Vec<GeneratedGlyph>) -> Vec<String> {
    glyphs.iter().map(glyph::render_glyph_cell).collect()
}
