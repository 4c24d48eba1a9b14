use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use genai_client::{
    CopyGenerator, FallbackCopywriter, GenAiError, ImageGenerator, PromptTextGenerator,
};
use shared::domain::LeadForm;
use tokio::{
    sync::{broadcast::error::RecvError, Notify},
    time::Instant,
};

use super::*;

// ---- collaborators ----

struct StaticCopy(CopyBundle);

#[async_trait]
impl CopyGenerator for StaticCopy {
    async fn generate_copy(&self, _course: &str) -> Result<CopyBundle> {
        Ok(self.0.clone())
    }
}

struct FailingCopy;

#[async_trait]
impl CopyGenerator for FailingCopy {
    async fn generate_copy(&self, _course: &str) -> Result<CopyBundle> {
        Err(anyhow!("upstream returned 503"))
    }
}

/// Holds every call until released.
#[derive(Default)]
struct GatedCopy {
    release: Notify,
}

#[async_trait]
impl CopyGenerator for GatedCopy {
    async fn generate_copy(&self, course: &str) -> Result<CopyBundle> {
        self.release.notified().await;
        Ok(prompts::fallback_copy(course))
    }
}

struct StaticImage(Option<GeneratedImage>);

#[async_trait]
impl ImageGenerator for StaticImage {
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>> {
        assert_eq!(request.options, ImageOptions::default());
        Ok(self.0.clone())
    }
}

struct StaticText(Option<String>);

#[async_trait]
impl PromptTextGenerator for StaticText {
    async fn generate_text(&self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

struct FailingImage;

#[async_trait]
impl ImageGenerator for FailingImage {
    async fn generate_image(&self, _request: &ImageRequest) -> Result<Option<GeneratedImage>> {
        Err(GenAiError::Decode("invalid base64 in predictions[0]".into()).into())
    }
}

struct FailingText;

#[async_trait]
impl PromptTextGenerator for FailingText {
    async fn generate_text(&self, _prompt: &str) -> Result<Option<String>> {
        Err(anyhow!("generation api error (400): API key not valid"))
    }
}

#[derive(Default)]
struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    broken: bool,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.broken {
            anyhow::bail!("clipboard is locked");
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---- harness ----

fn backends(copy: impl CopyGenerator + 'static) -> GenerationBackends {
    GenerationBackends {
        copy: Arc::new(copy),
        images: None,
        prompts: None,
    }
}

fn seed() -> Vec<Offer> {
    storage::default_offers()
}

struct Harness {
    handle: EngineHandle,
    events: broadcast::Receiver<UiEvent>,
}

impl Harness {
    fn start(backends: GenerationBackends) -> Self {
        Self::start_with(backends, Arc::new(RecordingClipboard::default()), seed())
    }

    fn start_with(
        backends: GenerationBackends,
        clipboard: Arc<dyn ClipboardSink>,
        offers: Vec<Offer>,
    ) -> Self {
        let handle = EngineHandle::spawn(
            EngineConfig::default(),
            backends,
            clipboard,
            CampaignStore::default(),
            offers,
        );
        let events = handle.subscribe_events();
        Self { handle, events }
    }

    /// Start with autoplay held off so slide positions stay put.
    async fn start_hovered(backends: GenerationBackends) -> Self {
        let harness = Self::start(backends);
        harness.send(Command::SetHover { hovering: true }).await;
        harness
    }

    async fn send(&self, cmd: Command) {
        self.handle.send(cmd).await.expect("engine stopped");
    }

    async fn snapshot(&self) -> EngineSnapshot {
        self.handle.snapshot().await.expect("engine stopped")
    }

    async fn wait_for<T>(&mut self, mut pick: impl FnMut(&UiEvent) -> Option<T>) -> T {
        let events = &mut self.events;
        tokio::time::timeout(Duration::from_secs(120), async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Some(found) = pick(&event) {
                            return found;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => panic!("engine event stream closed"),
                }
            }
        })
        .await
        .expect("timed out waiting for engine event")
    }

    /// Status transitions for `key` up to and including the return to idle.
    async fn status_trace(&mut self, key: &TaskKey) -> Vec<(TaskStatus, Instant)> {
        let mut trace = Vec::new();
        loop {
            let status = self
                .wait_for(|event| match event {
                    UiEvent::TaskStatusChanged { key: changed, status } if changed == key => {
                        Some(*status)
                    }
                    _ => None,
                })
                .await;
            trace.push((status, Instant::now()));
            if status == TaskStatus::Idle {
                return trace;
            }
        }
    }

    async fn next_error(&mut self) -> UiError {
        self.wait_for(|event| match event {
            UiEvent::Error(err) => Some(err.clone()),
            _ => None,
        })
        .await
    }

    fn drain(&mut self) -> Vec<UiEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    async fn stop(self) {
        self.handle.shutdown().await.expect("engine shutdown");
    }
}

/// Errors already queued on a receiver subscribed before the command was sent.
fn queued_errors(events: &mut broadcast::Receiver<UiEvent>) -> Vec<UiError> {
    let mut errors = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let UiEvent::Error(err) = event {
            errors.push(err);
        }
    }
    errors
}

fn statuses(trace: &[(TaskStatus, Instant)]) -> Vec<TaskStatus> {
    trace.iter().map(|(status, _)| *status).collect()
}

fn psicologia_bundle() -> CopyBundle {
    CopyBundle {
        headline: Some("Psicologia 2025".into()),
        subtitle: Some("Entenda a mente humana".into()),
        discount: Some("40% OFF".into()),
        cta_text: Some("Quero me inscrever".into()),
        color_from: Some("from-teal-900".into()),
        color_to: Some("to-teal-600".into()),
    }
}

// ---- copy generation ----

#[tokio::test(start_paused = true)]
async fn copy_generation_appends_offer_and_reverts_after_two_seconds() {
    let mut harness = Harness::start_hovered(backends(StaticCopy(psicologia_bundle()))).await;

    harness
        .send(Command::GenerateCopy {
            course: "Psicologia".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::copy()).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Succeeded, TaskStatus::Idle]
    );
    assert!(trace[2].1 - trace[1].1 >= Duration::from_millis(2000));

    let snapshot = harness.snapshot().await;
    assert_eq!(snapshot.offers.len(), 4);
    assert_eq!(snapshot.current_index, Some(3));
    let created = snapshot.current_offer().expect("current offer");
    assert_eq!(created.course, "Psicologia");
    assert_eq!(created.headline, "Psicologia 2025");
    assert_eq!(created.discount, "40% OFF");
    assert_eq!(
        created.image.as_deref(),
        Some("https://placehold.co/400x600/transparent/FFFFFF/png?text=Psicologia")
    );
    assert!(snapshot.offers[..3].iter().all(|offer| offer.id != created.id));
    assert!(snapshot.tasks.is_empty());

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn course_name_is_trimmed_before_generation() {
    let mut harness = Harness::start_hovered(backends(StaticCopy(CopyBundle::default()))).await;

    harness
        .send(Command::GenerateCopy {
            course: "  Arquitetura  ".into(),
        })
        .await;
    let course = harness
        .wait_for(|event| match event {
            UiEvent::OfferCreated { course, .. } => Some(course.clone()),
            _ => None,
        })
        .await;
    assert_eq!(course, "Arquitetura");

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failing_copy_reports_failure_and_keeps_list() {
    let mut harness = Harness::start_hovered(backends(FailingCopy)).await;
    let before = harness.snapshot().await;
    let mut notices = harness.handle.subscribe_events();

    harness
        .send(Command::GenerateCopy { course: "X".into() })
        .await;
    let trace = harness.status_trace(&TaskKey::copy()).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Failed, TaskStatus::Idle]
    );
    assert!(trace[2].1 - trace[1].1 >= Duration::from_millis(3000));

    let after = harness.snapshot().await;
    assert_eq!(after.offers, before.offers);
    assert_eq!(after.current_index, before.current_index);

    let errors = queued_errors(&mut notices);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::Collaborator);
    assert_eq!(errors[0].context(), UiErrorContext::GenerateCopy);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn fallback_copywriter_turns_failure_into_canned_offer() {
    let copy = FallbackCopywriter::new(Arc::new(FailingCopy));
    let mut harness = Harness::start_hovered(backends(copy)).await;

    harness
        .send(Command::GenerateCopy {
            course: "Nutrição".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::copy()).await;
    assert_eq!(trace[1].0, TaskStatus::Succeeded);

    let snapshot = harness.snapshot().await;
    let created = snapshot.current_offer().expect("current offer");
    assert_eq!(created.headline, "Estude Nutrição Conosco");
    assert_eq!(created.color_from, "from-gray-900");

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn blank_course_names_are_ignored() {
    let mut harness = Harness::start_hovered(backends(StaticCopy(psicologia_bundle()))).await;

    for course in ["", "   "] {
        harness
            .send(Command::GenerateCopy {
                course: course.into(),
            })
            .await;
    }
    let snapshot = harness.snapshot().await;

    assert_eq!(snapshot.offers.len(), 3);
    assert!(snapshot.tasks.is_empty());
    assert!(!harness
        .drain()
        .iter()
        .any(|event| matches!(event, UiEvent::TaskStatusChanged { .. })));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn duplicate_copy_request_is_rejected_while_running() {
    let gate = Arc::new(GatedCopy::default());
    let backends = GenerationBackends {
        copy: gate.clone(),
        images: None,
        prompts: None,
    };
    let mut harness = Harness::start_hovered(backends).await;

    harness
        .send(Command::GenerateCopy {
            course: "Medicina".into(),
        })
        .await;
    harness
        .send(Command::GenerateCopy {
            course: "Direito".into(),
        })
        .await;

    let err = harness.next_error().await;
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.context(), UiErrorContext::GenerateCopy);
    assert_eq!(
        harness.snapshot().await.task_status(&TaskKey::copy()),
        TaskStatus::Running
    );

    gate.release.notify_one();
    let created = harness
        .wait_for(|event| match event {
            UiEvent::OfferCreated { course, .. } => Some(course.clone()),
            _ => None,
        })
        .await;
    assert_eq!(created, "Medicina");
    assert_eq!(harness.snapshot().await.offers.len(), 4);

    harness.stop().await;
}

// ---- image generation ----

fn image_backends(image: Option<GeneratedImage>) -> GenerationBackends {
    GenerationBackends {
        copy: Arc::new(FallbackCopywriter::canned_only()),
        images: Some(Arc::new(StaticImage(image))),
        prompts: None,
    }
}

#[tokio::test(start_paused = true)]
async fn empty_image_payload_fails_without_mutation() {
    let empty = GeneratedImage {
        mime_type: "image/png".into(),
        bytes: Vec::new(),
    };
    let mut harness = Harness::start_hovered(image_backends(Some(empty))).await;
    let before = harness.snapshot().await;
    let target = OfferId::new("2");

    harness
        .send(Command::GenerateImage {
            offer_id: target.clone(),
            course: "Direito".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::image(target)).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Failed, TaskStatus::Idle]
    );
    assert_eq!(harness.snapshot().await.offers, before.offers);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn image_collaborator_error_fails_without_mutation() {
    let backends = GenerationBackends {
        copy: Arc::new(FallbackCopywriter::canned_only()),
        images: Some(Arc::new(FailingImage)),
        prompts: None,
    };
    let mut harness = Harness::start_hovered(backends).await;
    let before = harness.snapshot().await;
    let mut notices = harness.handle.subscribe_events();
    let target = OfferId::new("2");

    harness
        .send(Command::GenerateImage {
            offer_id: target.clone(),
            course: "Direito".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::image(target)).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Failed, TaskStatus::Idle]
    );
    let after = harness.snapshot().await;
    assert_eq!(after.offers, before.offers);
    assert_eq!(after.current_index, before.current_index);

    // The decode message mentions "invalid" but the failure is still the
    // collaborator's.
    let errors = queued_errors(&mut notices);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::Collaborator);
    assert_eq!(errors[0].context(), UiErrorContext::GenerateImage);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn absent_image_is_reported_to_operator() {
    let mut harness = Harness::start_hovered(image_backends(None)).await;

    harness
        .send(Command::GenerateImage {
            offer_id: OfferId::new("1"),
            course: "Medicina".into(),
        })
        .await;
    let err = harness.next_error().await;

    assert_eq!(err.context(), UiErrorContext::GenerateImage);
    assert_eq!(err.message(), "Could not generate image.");

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn generated_image_replaces_only_target_offer() {
    let png = GeneratedImage {
        mime_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    let mut harness = Harness::start_hovered(image_backends(Some(png))).await;
    harness.send(Command::GoTo { index: 2 }).await;
    let before = harness.snapshot().await;
    let target = OfferId::new("2");

    harness
        .send(Command::GenerateImage {
            offer_id: target.clone(),
            course: "Direito".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::image(target.clone())).await;
    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Succeeded, TaskStatus::Idle]
    );

    let after = harness.snapshot().await;
    assert_eq!(after.offers.len(), 3);
    // The list is replaced wholesale, which resets the position.
    assert_eq!(after.current_index, Some(0));
    for (old, new) in before.offers.iter().zip(&after.offers) {
        if old.id == target {
            assert_eq!(new.image.as_deref(), Some("data:image/png;base64,iVBORw=="));
            assert_eq!(new.headline, old.headline);
        } else {
            assert_eq!(new, old);
        }
    }

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn image_generation_without_credential_never_runs() {
    let mut harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;

    harness
        .send(Command::GenerateImage {
            offer_id: OfferId::new("1"),
            course: "Medicina".into(),
        })
        .await;
    let err = harness.next_error().await;

    assert_eq!(err.code(), ErrorCode::MissingConfiguration);
    assert!(harness.snapshot().await.tasks.is_empty());
    assert!(!harness
        .drain()
        .iter()
        .any(|event| matches!(event, UiEvent::TaskStatusChanged { .. })));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn image_generation_for_unknown_offer_is_rejected() {
    let mut harness = Harness::start_hovered(image_backends(None)).await;

    harness
        .send(Command::GenerateImage {
            offer_id: OfferId::new("missing"),
            course: "Medicina".into(),
        })
        .await;
    let err = harness.next_error().await;

    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(harness.snapshot().await.tasks.is_empty());

    harness.stop().await;
}

// ---- prompt generation ----

fn prompt_backends(text: Option<&str>) -> GenerationBackends {
    GenerationBackends {
        copy: Arc::new(FallbackCopywriter::canned_only()),
        images: None,
        prompts: Some(Arc::new(StaticText(text.map(str::to_string)))),
    }
}

#[tokio::test(start_paused = true)]
async fn prompt_text_is_copied_to_clipboard() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let mut harness = Harness::start_with(
        prompt_backends(Some("Fotografia de estúdio, jovem estudante de medicina")),
        clipboard.clone(),
        seed(),
    );
    harness.send(Command::SetHover { hovering: true }).await;
    let target = OfferId::new("1");

    harness
        .send(Command::GeneratePrompt {
            offer_id: target.clone(),
            course: "Medicina".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::prompt(target)).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Succeeded, TaskStatus::Idle]
    );
    assert_eq!(
        clipboard.writes.lock().unwrap().as_slice(),
        ["Fotografia de estúdio, jovem estudante de medicina"]
    );

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn prompt_fails_when_clipboard_is_unavailable() {
    let clipboard = Arc::new(RecordingClipboard {
        broken: true,
        ..Default::default()
    });
    let mut harness = Harness::start_with(prompt_backends(Some("brief")), clipboard, seed());
    harness.send(Command::SetHover { hovering: true }).await;
    let target = OfferId::new("3");

    harness
        .send(Command::GeneratePrompt {
            offer_id: target.clone(),
            course: "Engenharia de Software".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::prompt(target)).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Failed, TaskStatus::Idle]
    );

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn prompt_collaborator_error_fails_without_clipboard_write() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let backends = GenerationBackends {
        copy: Arc::new(FallbackCopywriter::canned_only()),
        images: None,
        prompts: Some(Arc::new(FailingText)),
    };
    let mut harness = Harness::start_with(backends, clipboard.clone(), seed());
    harness.send(Command::SetHover { hovering: true }).await;
    let before = harness.snapshot().await;
    let mut notices = harness.handle.subscribe_events();
    let target = OfferId::new("1");

    harness
        .send(Command::GeneratePrompt {
            offer_id: target.clone(),
            course: "Medicina".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::prompt(target)).await;

    assert_eq!(
        statuses(&trace),
        vec![TaskStatus::Running, TaskStatus::Failed, TaskStatus::Idle]
    );
    assert!(clipboard.writes.lock().unwrap().is_empty());
    assert_eq!(harness.snapshot().await.offers, before.offers);

    // An upstream body quoting "API key" is not a missing credential.
    let errors = queued_errors(&mut notices);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::Collaborator);
    assert_eq!(errors[0].context(), UiErrorContext::GeneratePrompt);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn empty_prompt_text_is_a_failure() {
    let mut harness = Harness::start_hovered(prompt_backends(None)).await;
    let target = OfferId::new("1");

    harness
        .send(Command::GeneratePrompt {
            offer_id: target.clone(),
            course: "Medicina".into(),
        })
        .await;
    let trace = harness.status_trace(&TaskKey::prompt(target)).await;

    assert_eq!(trace[1].0, TaskStatus::Failed);

    harness.stop().await;
}

// ---- import / export ----

#[tokio::test(start_paused = true)]
async fn malformed_import_leaves_offers_untouched() {
    let mut harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;
    harness.send(Command::GoTo { index: 1 }).await;
    let before = harness.snapshot().await;

    harness
        .send(Command::ImportDocument {
            document: "{not valid json".into(),
        })
        .await;
    let err = harness.next_error().await;

    assert_eq!(err.context(), UiErrorContext::Import);
    assert_eq!(err.code(), ErrorCode::Validation);
    let after = harness.snapshot().await;
    assert_eq!(after.offers, before.offers);
    assert_eq!(after.current_index, Some(1));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn valid_import_replaces_offers_and_resets_position() {
    let mut harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;
    harness.send(Command::GoTo { index: 2 }).await;
    let imported = vec![seed().remove(1)];
    let document = storage::encode_offers(&imported).expect("encode");

    harness.send(Command::ImportDocument { document }).await;
    let count = harness
        .wait_for(|event| match event {
            UiEvent::Imported { count } => Some(*count),
            _ => None,
        })
        .await;

    assert_eq!(count, 1);
    let snapshot = harness.snapshot().await;
    assert_eq!(snapshot.offers, imported);
    assert_eq!(snapshot.current_index, Some(0));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn export_then_import_through_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out").join("campaigns.json");
    let mut harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;

    harness
        .send(Command::Export {
            path: Some(path.clone()),
        })
        .await;
    let (written, count) = harness
        .wait_for(|event| match event {
            UiEvent::Exported { path, count } => Some((path.clone(), *count)),
            _ => None,
        })
        .await;
    assert_eq!(written, path);
    assert_eq!(count, 3);

    harness
        .send(Command::ImportDocument {
            document: "[]".into(),
        })
        .await;
    harness
        .wait_for(|event| matches!(event, UiEvent::Imported { count: 0 }).then_some(()))
        .await;
    assert_eq!(harness.snapshot().await.current_index, None);

    harness.send(Command::ImportFile { path }).await;
    harness
        .wait_for(|event| matches!(event, UiEvent::Imported { count: 3 }).then_some(()))
        .await;
    assert_eq!(harness.snapshot().await.offers, seed());

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn importing_missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;

    harness
        .send(Command::ImportFile {
            path: dir.path().join("absent.json"),
        })
        .await;
    let err = harness.next_error().await;

    assert_eq!(err.context(), UiErrorContext::Import);
    assert_eq!(harness.snapshot().await.offers.len(), 3);

    harness.stop().await;
}

// ---- autoplay ----

#[tokio::test(start_paused = true)]
async fn autoplay_advances_every_interval_and_wraps() {
    let mut harness = Harness::start(backends(FallbackCopywriter::canned_only()));
    let started = Instant::now();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let index = harness
            .wait_for(|event| match event {
                UiEvent::SlideChanged { index, .. } => Some(*index),
                _ => None,
            })
            .await;
        seen.push(index);
    }

    assert_eq!(seen, vec![1, 2, 0]);
    assert!(started.elapsed() >= Duration::from_millis(15_000));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn hover_pauses_autoplay_until_pointer_leaves() {
    let mut harness = Harness::start(backends(FallbackCopywriter::canned_only()));

    harness.send(Command::SetHover { hovering: true }).await;
    harness
        .wait_for(|event| matches!(event, UiEvent::AutoplayChanged { running: false }).then_some(()))
        .await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    let snapshot = harness.snapshot().await;
    assert!(snapshot.paused);
    assert!(!snapshot.autoplay_running);
    assert_eq!(snapshot.current_index, Some(0));

    harness.send(Command::SetHover { hovering: false }).await;
    let index = harness
        .wait_for(|event| match event {
            UiEvent::SlideChanged { index, .. } => Some(*index),
            _ => None,
        })
        .await;
    assert_eq!(index, 1);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn manual_navigation_wraps_in_both_directions() {
    let harness = Harness::start_hovered(backends(FallbackCopywriter::canned_only())).await;

    harness.send(Command::GoTo { index: 2 }).await;
    harness.send(Command::Next).await;
    assert_eq!(harness.snapshot().await.current_index, Some(0));

    harness.send(Command::Previous).await;
    assert_eq!(harness.snapshot().await.current_index, Some(2));

    harness.send(Command::GoTo { index: 9 }).await;
    assert_eq!(harness.snapshot().await.current_index, Some(2));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn empty_campaign_list_has_no_slide() {
    let harness = Harness::start_with(
        backends(FallbackCopywriter::canned_only()),
        Arc::new(RecordingClipboard::default()),
        Vec::new(),
    );

    tokio::time::sleep(Duration::from_secs(12)).await;
    harness.send(Command::Next).await;
    let snapshot = harness.snapshot().await;

    assert_eq!(snapshot.current_index, None);
    assert!(snapshot.current_offer().is_none());

    harness.stop().await;
}

// ---- lead capture ----

#[tokio::test(start_paused = true)]
async fn lead_flow_captures_and_auto_closes() {
    let mut harness = Harness::start(backends(FallbackCopywriter::canned_only()));

    harness.send(Command::OpenLeadModal).await;
    let course = harness
        .wait_for(|event| match event {
            UiEvent::LeadModalChanged {
                open: true,
                course_interest,
            } => Some(course_interest.clone()),
            _ => None,
        })
        .await;
    assert_eq!(course, "Medicina");
    let opened = harness.snapshot().await;
    assert!(opened.modal_open);
    assert!(opened.paused);
    assert!(!opened.autoplay_running);

    harness
        .send(Command::SubmitLead {
            form: LeadForm {
                name: "Ana".into(),
                email: "not-an-email".into(),
                phone: "11 99999-0000".into(),
            },
        })
        .await;
    let err = harness.next_error().await;
    assert_eq!(err.context(), UiErrorContext::Lead);
    assert!(matches!(
        harness.snapshot().await.lead_state,
        LeadModalState::Editing { .. }
    ));

    harness
        .send(Command::SubmitLead {
            form: LeadForm {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                phone: "11 99999-0000".into(),
            },
        })
        .await;
    let submitted = Instant::now();
    let lead = harness
        .wait_for(|event| match event {
            UiEvent::LeadCaptured(lead) => Some(lead.clone()),
            _ => None,
        })
        .await;
    let captured = Instant::now();
    assert!(captured - submitted >= Duration::from_millis(1500));
    assert_eq!(lead.course_interest, "Medicina");
    assert_eq!(lead.form.email, "ana@example.com");

    harness
        .wait_for(|event| matches!(event, UiEvent::LeadModalChanged { open: false, .. }).then_some(()))
        .await;
    assert!(Instant::now() - captured >= Duration::from_millis(2000));

    let closed = harness.snapshot().await;
    assert!(!closed.modal_open);
    assert!(!closed.paused);
    assert!(closed.autoplay_running);
    assert_eq!(closed.captured_leads.len(), 1);
    assert_eq!(closed.lead_state, LeadModalState::Closed);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn closing_modal_mid_submission_drops_the_lead() {
    let mut harness = Harness::start(backends(FallbackCopywriter::canned_only()));

    harness.send(Command::OpenLeadModal).await;
    harness
        .send(Command::SubmitLead {
            form: LeadForm {
                name: "Bruno".into(),
                email: "bruno@example.com".into(),
                phone: "21 98888-7777".into(),
            },
        })
        .await;
    harness.send(Command::CloseLeadModal).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snapshot = harness.snapshot().await;
    assert!(snapshot.captured_leads.is_empty());
    assert!(!snapshot.modal_open);
    assert!(!harness
        .drain()
        .iter()
        .any(|event| matches!(event, UiEvent::LeadCaptured(_))));

    harness.stop().await;
}

// ---- pure helpers ----

#[test]
fn offer_from_copy_fills_blank_and_missing_fields() {
    let bundle = CopyBundle {
        headline: Some("   ".into()),
        discount: Some("50% OFF".into()),
        ..Default::default()
    };

    let offer = offer_from_copy("Direito", bundle);

    assert_eq!(offer.headline, DEFAULT_HEADLINE);
    assert_eq!(offer.subtitle, DEFAULT_SUBTITLE);
    assert_eq!(offer.discount, "50% OFF");
    assert_eq!(offer.cta_text, DEFAULT_CTA_TEXT);
    assert_eq!(offer.color_from, DEFAULT_COLOR_FROM);
    assert_eq!(offer.color_to, DEFAULT_COLOR_TO);
    assert_ne!(offer_from_copy("Direito", CopyBundle::default()).id, offer.id);
}

#[test]
fn placeholder_image_percent_encodes_course() {
    assert_eq!(
        placeholder_image("Ciência & Tecnologia"),
        "https://placehold.co/400x600/transparent/FFFFFF/png?text=Ci%C3%AAncia%20%26%20Tecnologia"
    );
}
