//! Font Detective: identify a font from an image or a description.
//!
//! The core library is UI-free and builds without Tauri:
//!   - upload: image file → base64 payload
//!   - llm: request building, Gemini client, result extraction
//!   - glyph: text layout over supplied glyph outlines + SVG output
//!   - shell: the page state machine
//!   - config: env files, API key, endpoint settings
//!
//! With the `desktop` feature this is also the Tauri app shell:
//!   - commands.rs: main window commands
//!   - settings_commands.rs: API key management

pub mod config;
pub mod glyph;
pub mod llm;
pub mod shell;
pub mod upload;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
pub mod settings_commands;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use llm::prompts::GENERIC_FAILURE_MESSAGE;
use llm::{FontIdentifier, IdentificationResult, IdentifyError};
use shell::{Shell, ShellSnapshot, SubmitError};

/// Shared page state. Written and read by the Tauri commands.
pub struct AppState {
    shell: Mutex<Shell>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            shell: Mutex::new(Shell::new()),
        }
    }

    /// Lock the shell. A poisoned lock is recovered: the shell holds no
    /// invariant that a panicking holder could have half-updated.
    pub fn shell(&self) -> MutexGuard<'_, Shell> {
        self.shell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        self.shell().snapshot()
    }

    /// Run one submission end to end.
    ///
    /// The lock is released while the identifier runs. `connect` builds the
    /// identifier after the submission is accepted, so a configuration error
    /// becomes a `Failure` like any other. `notify` sees the `Submitting`
    /// snapshot and the final one. Validation failures come back as a
    /// snapshot carrying the inline notice.
    pub async fn identify_with<I, C, N>(
        &self,
        custom_prompt: Option<&str>,
        connect: C,
        notify: N,
    ) -> Result<ShellSnapshot, SubmitError>
    where
        I: FontIdentifier,
        C: FnOnce() -> Result<I, IdentifyError>,
        N: Fn(&ShellSnapshot),
    {
        let submission = {
            let mut shell = self.shell();
            match shell.begin_submission(custom_prompt) {
                Ok(submission) => submission,
                Err(SubmitError::Validation) => return Ok(shell.snapshot()),
                Err(e) => return Err(e),
            }
        };
        let mut pending = PendingCompletion {
            state: self,
            ticket: submission.ticket,
            outcome: None,
        };
        notify(&self.snapshot());

        let start = Instant::now();
        let outcome = match connect() {
            Ok(identifier) => identifier.identify(&submission.request).await,
            Err(e) => Err(e),
        };
        log::info!(
            "[PIPELINE] Identification #{} finished in {}ms",
            submission.ticket,
            start.elapsed().as_millis()
        );
        pending.outcome = Some(outcome);
        drop(pending);

        let snap = self.snapshot();
        notify(&snap);
        Ok(snap)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes a begun submission when dropped.
///
/// Covers unwinding and cancelled futures: without an outcome the
/// submission ends in the generic failure, never stuck in `Submitting`.
struct PendingCompletion<'a> {
    state: &'a AppState,
    ticket: u64,
    outcome: Option<Result<IdentificationResult, IdentifyError>>,
}

impl Drop for PendingCompletion<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            log::error!("[SHELL] #{} abandoned before completing", self.ticket);
            Err(IdentifyError::service(GENERIC_FAILURE_MESSAGE))
        });
        self.state.shell().complete(self.ticket, outcome);
    }
}

/// Entry point: called by the desktop binary.
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Load .env.local → .env from the project root (parent of src-tauri/),
    // regardless of the binary's working directory.
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let project_root = manifest_dir.parent().unwrap_or(manifest_dir);

    env_logger::init();
    config::load_env_files(project_root);

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            // Main window (commands.rs)
            commands::get_app_state,
            commands::set_prompt,
            commands::get_sample_prompts,
            commands::pick_image,
            commands::load_image,
            commands::upload_image_data,
            commands::clear_image,
            commands::identify_font,
            commands::submit_sample_prompt,
            commands::dismiss_result,
            commands::open_source,
            commands::render_text_preview,
            commands::render_glyph_grid,
            // Settings (settings_commands.rs)
            settings_commands::has_api_key,
            settings_commands::save_api_key,
            settings_commands::test_connection,
        ])
        .setup(|_app| {
            log::info!("Font Detective starting up");
            if config::resolve_api_key().is_none() {
                log::warn!("[CONFIG] No Gemini API key yet; identification will fail until one is saved");
            }
            Ok(())
        })
        .run(tauri::generate_context!());

    if let Err(e) = result {
        log::error!("Error running Font Detective: {}", e);
        std::process::exit(1);
    }
}
