//! End-to-end shell flow with a stub identifier.
//!
//! Exercises the page state machine the way the desktop commands drive it,
//! without any network access.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use font_detective_lib::config::GeminiConfig;
use font_detective_lib::llm::prompts::{
    DEFAULT_IMAGE_PROMPT, GENERIC_FAILURE_MESSAGE, SAMPLE_PROMPTS,
};
use font_detective_lib::llm::request::build_request;
use font_detective_lib::llm::{
    FontIdentifier, GeminiClient, IdentificationRequest, IdentificationResult, IdentifyError,
    SearchSource,
};
use font_detective_lib::shell::{Phase, Shell, SubmitError};
use font_detective_lib::upload::encode_image;
use font_detective_lib::AppState;

/// Records every request and answers from a canned outcome.
struct StubIdentifier {
    calls: AtomicUsize,
    seen: Mutex<Vec<IdentificationRequest>>,
    fail_with: Option<String>,
}

impl StubIdentifier {
    fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FontIdentifier for StubIdentifier {
    async fn identify(
        &self,
        request: &IdentificationRequest,
    ) -> Result<IdentificationResult, IdentifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        match &self.fail_with {
            Some(message) => Err(IdentifyError::Service {
                status: Some(500),
                message: message.clone(),
            }),
            None => Ok(IdentificationResult {
                analysis_text: "**Futura**\n\nGeometric sans-serif.".to_string(),
                sources: vec![SearchSource {
                    title: "Futura".to_string(),
                    uri: "https://fonts.example/futura".to_string(),
                }],
                identified_name: Some("Futura".to_string()),
            }),
        }
    }
}

/// Panics mid-request, like a bug deep in a client.
struct PanickingIdentifier;

impl FontIdentifier for PanickingIdentifier {
    async fn identify(
        &self,
        _request: &IdentificationRequest,
    ) -> Result<IdentificationResult, IdentifyError> {
        panic!("identifier blew up");
    }
}

#[tokio::test]
async fn blank_submission_never_reaches_identifier() {
    let stub = StubIdentifier::succeeding();
    let mut shell = Shell::new();

    for prompt in ["", "   ", "\n\t"] {
        shell.set_prompt(prompt);
        let err = shell.submit(&stub, None).await.unwrap_err();
        assert_eq!(err, SubmitError::Validation);
    }

    assert_eq!(stub.calls(), 0);
    assert_eq!(shell.phase(), &Phase::Idle);
    assert_eq!(shell.notice(), Some("Please upload an image or describe a font."));
}

#[tokio::test]
async fn text_submission_succeeds() {
    let stub = StubIdentifier::succeeding();
    let mut shell = Shell::new();
    shell.set_prompt("What is the font used in the Netflix logo?");

    let phase = shell.submit(&stub, None).await.unwrap().clone();
    let Phase::Success(result) = phase else {
        panic!("expected success, got {:?}", phase);
    };
    assert_eq!(result.identified_name.as_deref(), Some("Futura"));
    assert_eq!(result.sources.len(), 1);
    assert_eq!(stub.calls(), 1);
    assert!(shell.notice().is_none());
}

#[tokio::test]
async fn image_only_submission_uses_default_instruction() {
    let stub = StubIdentifier::succeeding();
    let mut shell = Shell::new();
    shell.set_upload(encode_image("poster.jpg", b"\xFF\xD8\xFF\xE0", Some("image/jpeg")).unwrap());

    shell.submit(&stub, None).await.unwrap();

    let seen = stub.seen.lock().unwrap();
    let request = &seen[0];
    assert_eq!(request.image().unwrap().mime_type, "image/jpeg");

    let body = serde_json::to_value(build_request(request)).unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert!(parts[0].get("inlineData").is_some());
    assert_eq!(parts[1]["text"], DEFAULT_IMAGE_PROMPT);
}

#[tokio::test]
async fn failure_carries_service_message() {
    let stub = StubIdentifier::failing("Resource has been exhausted (e.g. check quota).");
    let mut shell = Shell::new();

    let phase = shell.submit(&stub, Some("Vogue masthead")).await.unwrap();
    assert_eq!(
        phase,
        &Phase::Failure("Resource has been exhausted (e.g. check quota).".to_string())
    );
}

#[tokio::test]
async fn blank_failure_message_uses_generic_text() {
    let stub = StubIdentifier::failing("");
    let mut shell = Shell::new();

    let phase = shell.submit(&stub, Some("Vogue masthead")).await.unwrap();
    assert_eq!(
        phase,
        &Phase::Failure("Failed to identify font. Please try again.".to_string())
    );
}

#[tokio::test]
async fn resubmission_clears_previous_outcome() {
    let ok = StubIdentifier::succeeding();
    let bad = StubIdentifier::failing("boom");
    let mut shell = Shell::new();

    shell.submit(&bad, Some("first")).await.unwrap();
    assert!(matches!(shell.phase(), Phase::Failure(_)));

    shell.submit(&ok, Some("second")).await.unwrap();
    assert!(matches!(shell.phase(), Phase::Success(_)));

    shell.submit(&bad, Some("third")).await.unwrap();
    assert!(matches!(shell.phase(), Phase::Failure(m) if m == "boom"));
}

#[tokio::test]
async fn sample_prompt_populates_and_submits() {
    let stub = StubIdentifier::succeeding();
    let mut shell = Shell::new();

    shell.submit_sample(&stub, 2).await.unwrap();
    assert_eq!(shell.prompt(), SAMPLE_PROMPTS[2]);
    assert_eq!(stub.seen.lock().unwrap()[0].text_prompt(), SAMPLE_PROMPTS[2]);

    let err = shell.submit_sample(&stub, SAMPLE_PROMPTS.len()).await.unwrap_err();
    assert_eq!(err, SubmitError::UnknownSample(SAMPLE_PROMPTS.len()));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn app_state_reports_submitting_then_outcome() {
    let state = AppState::new();
    let seen = Mutex::new(Vec::new());

    let snap = state
        .identify_with(
            Some("What is the font used in the Netflix logo?"),
            || Ok(StubIdentifier::succeeding()),
            |snap| seen.lock().unwrap().push(snap.phase.clone()),
        )
        .await
        .unwrap();

    assert!(matches!(snap.phase, Phase::Success(_)));
    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], Phase::Submitting);
    assert_eq!(seen[1], snap.phase);
}

#[tokio::test]
async fn app_state_validation_returns_notice_without_connecting() {
    let state = AppState::new();
    let connected = Cell::new(false);
    let notified = Cell::new(0);

    let snap = state
        .identify_with(
            Some("   "),
            || {
                connected.set(true);
                Ok(StubIdentifier::succeeding())
            },
            |_| notified.set(notified.get() + 1),
        )
        .await
        .unwrap();

    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.notice.as_deref(), Some("Please upload an image or describe a font."));
    assert!(!connected.get());
    assert_eq!(notified.get(), 0);
}

#[tokio::test]
async fn missing_key_ends_in_failure_without_a_request() {
    let state = AppState::new();

    let snap = state
        .identify_with(
            Some("Vogue masthead"),
            || GeminiConfig::from_lookup(|_| None, || None).and_then(GeminiClient::from_config),
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(
        snap.phase,
        Phase::Failure("GEMINI_API_KEY is not set. Add your Gemini API key in Settings.".to_string())
    );

    // The shell is free again for the next attempt.
    let snap = state
        .identify_with(Some("Vogue masthead"), || Ok(StubIdentifier::succeeding()), |_| {})
        .await
        .unwrap();
    assert!(matches!(snap.phase, Phase::Success(_)));
}

#[tokio::test]
async fn panicking_identifier_does_not_leave_shell_submitting() {
    let state = Arc::new(AppState::new());

    let task = {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state
                .identify_with(Some("Vogue masthead"), || Ok(PanickingIdentifier), |_| {})
                .await
        })
    };
    assert!(task.await.unwrap_err().is_panic());

    assert_eq!(
        state.snapshot().phase,
        Phase::Failure(GENERIC_FAILURE_MESSAGE.to_string())
    );

    let snap = state
        .identify_with(Some("Vogue masthead"), || Ok(StubIdentifier::succeeding()), |_| {})
        .await
        .unwrap();
    assert!(matches!(snap.phase, Phase::Success(_)));
}

#[tokio::test]
async fn overlapping_submission_is_rejected_by_app_state() {
    let state = AppState::new();
    let first = state.shell().begin_submission(Some("first")).unwrap();

    let err = state
        .identify_with(Some("second"), || Ok(StubIdentifier::succeeding()), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err, SubmitError::InFlight);

    assert!(state.shell().complete(first.ticket, Err(IdentifyError::EmptyResponse)));
    assert!(matches!(state.snapshot().phase, Phase::Failure(_)));
}
