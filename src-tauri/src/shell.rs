//! Application shell: the UI state machine.
//!
//! Phases: Idle → Submitting → {Success, Failure} → Idle.
//! A result and an error can never coexist; the phase carries exactly one.
//!
//! Submissions are serialized: while one is in flight, another is
//! rejected. Each submission gets a ticket, and a completion carrying an
//! old ticket is dropped, so a late response can never overwrite newer state.
//!
//! `AppState::identify_with` holds the shell behind a mutex and splits a
//! submission into `begin_submission` / `complete` so the lock is not held
//! across the network call. Single-owner callers use `submit`.

use serde::Serialize;

use crate::llm::prompts::{GENERIC_FAILURE_MESSAGE, SAMPLE_PROMPTS, VALIDATION_MESSAGE};
use crate::llm::{FontIdentifier, IdentificationRequest, IdentificationResult, IdentifyError};
use crate::upload::{UploadError, UploadedFile};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Success(IdentificationResult),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please upload an image or describe a font.")]
    Validation,
    #[error("An identification is already in progress.")]
    InFlight,
    #[error("Unknown sample prompt: {0}")]
    UnknownSample(usize),
}

/// A submission that passed validation and is waiting for its outcome.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: u64,
    pub request: IdentificationRequest,
}

/// Everything the frontend needs to draw the page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSnapshot {
    pub prompt: String,
    pub upload: Option<UploadedFile>,
    pub phase: Phase,
    /// Inline message for rejected input (validation, bad file).
    pub notice: Option<String>,
}

#[derive(Debug, Default)]
pub struct Shell {
    prompt: String,
    upload: Option<UploadedFile>,
    phase: Phase,
    notice: Option<String>,
    ticket: u64,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn upload(&self) -> Option<&UploadedFile> {
        self.upload.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Replace the current upload wholesale.
    pub fn set_upload(&mut self, file: UploadedFile) {
        log::info!("[SHELL] Upload set: {} ({})", file.file_name, file.mime_type);
        self.upload = Some(file);
        self.notice = None;
    }

    /// Record a rejected file. The current upload stays as it was.
    pub fn reject_upload(&mut self, error: &UploadError) {
        log::warn!("[SHELL] Upload rejected: {}", error);
        self.notice = Some(error.to_string());
    }

    pub fn clear_upload(&mut self) {
        self.upload = None;
    }

    /// Back to Idle from a finished submission. No effect while submitting.
    pub fn dismiss(&mut self) {
        if !self.is_submitting() {
            self.phase = Phase::Idle;
            self.notice = None;
        }
    }

    /// Validate and start a submission.
    ///
    /// A non-empty `custom_prompt` is used instead of the stored prompt and
    /// becomes the stored prompt. Blank prompt with no upload leaves the
    /// phase untouched and sets the inline notice.
    pub fn begin_submission(&mut self, custom_prompt: Option<&str>) -> Result<Submission, SubmitError> {
        if self.is_submitting() {
            log::warn!("[SHELL] Submission rejected: already in flight");
            return Err(SubmitError::InFlight);
        }

        if let Some(custom) = custom_prompt.filter(|p| !p.is_empty()) {
            self.prompt = custom.to_string();
        }

        let image = self.upload.as_ref().map(UploadedFile::inline_image);
        let request = match IdentificationRequest::new(self.prompt.clone(), image) {
            Ok(request) => request,
            Err(_) => {
                log::info!("[SHELL] Submission rejected: no prompt and no image");
                self.notice = Some(VALIDATION_MESSAGE.to_string());
                return Err(SubmitError::Validation);
            }
        };

        self.ticket += 1;
        self.notice = None;
        self.phase = Phase::Submitting;
        log::info!(
            "[SHELL] Submitting #{} (image={}, prompt={} chars)",
            self.ticket,
            request.image().is_some(),
            request.text_prompt().len()
        );

        Ok(Submission {
            ticket: self.ticket,
            request,
        })
    }

    /// Commit the outcome of a submission. Returns false if it was stale.
    pub fn complete(
        &mut self,
        ticket: u64,
        outcome: Result<IdentificationResult, IdentifyError>,
    ) -> bool {
        if ticket != self.ticket || !self.is_submitting() {
            log::warn!("[SHELL] Dropping stale outcome #{} (current #{})", ticket, self.ticket);
            return false;
        }

        self.phase = match outcome {
            Ok(result) => {
                log::info!("[SHELL] #{} succeeded", ticket);
                Phase::Success(result)
            }
            Err(e) => {
                log::error!("[SHELL] #{} failed: {}", ticket, e);
                Phase::Failure(failure_message(&e))
            }
        };
        true
    }

    /// Run a whole submission against `identifier`.
    pub async fn submit<I: FontIdentifier>(
        &mut self,
        identifier: &I,
        custom_prompt: Option<&str>,
    ) -> Result<&Phase, SubmitError> {
        let submission = self.begin_submission(custom_prompt)?;
        let outcome = identifier.identify(&submission.request).await;
        self.complete(submission.ticket, outcome);
        Ok(&self.phase)
    }

    /// Populate the prompt with one of the sample prompts and submit it.
    pub async fn submit_sample<I: FontIdentifier>(
        &mut self,
        identifier: &I,
        index: usize,
    ) -> Result<&Phase, SubmitError> {
        let prompt = sample_prompt(index)?;
        self.submit(identifier, Some(prompt)).await
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            prompt: self.prompt.clone(),
            upload: self.upload.clone(),
            phase: self.phase.clone(),
            notice: self.notice.clone(),
        }
    }
}

pub fn sample_prompt(index: usize) -> Result<&'static str, SubmitError> {
    SAMPLE_PROMPTS
        .get(index)
        .copied()
        .ok_or(SubmitError::UnknownSample(index))
}

/// User-facing text for a failure, with a generic fallback for blank messages.
pub fn failure_message(error: &IdentifyError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}
