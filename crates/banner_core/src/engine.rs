//! The engine task: single owner of the carousel, the generation tracker and
//! the lead modal.
//!
//! Commands, timer ticks and generation completions all arrive as messages
//! and are applied one at a time. Generation calls run in spawned tasks that
//! only report back; they never touch engine state directly.

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use genai_client::{prompts, GenerationBackends};
use shared::{
    domain::{CapturedLead, Offer, OfferId, TaskKey, TaskStatus},
    error::ErrorCode,
    protocol::{CopyBundle, GeneratedImage, ImageOptions, ImageRequest},
};
use storage::CampaignStore;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    autoplay::{Autoplay, AutoplayChange, DEFAULT_AUTOPLAY_INTERVAL},
    carousel::CarouselController,
    commands::Command,
    events::{UiError, UiErrorContext, UiEvent},
    lead::{LeadCapture, LeadModalState},
    tracker::{GenerationTracker, TaskTicket},
    ClipboardSink,
};

const COMMAND_QUEUE_CAPACITY: usize = 64;
const EVENT_BUFFER_CAPACITY: usize = 256;

pub const DEFAULT_HEADLINE: &str = "Curso de Excelência";
pub const DEFAULT_SUBTITLE: &str = "Inscreva-se hoje mesmo";
pub const DEFAULT_DISCOUNT: &str = "Condições Especiais";
pub const DEFAULT_CTA_TEXT: &str = "Saiba Mais";
pub const DEFAULT_COLOR_FROM: &str = "from-indigo-900";
pub const DEFAULT_COLOR_TO: &str = "to-indigo-600";

const PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co/400x600/transparent/FFFFFF/png?text=";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub autoplay_interval: Duration,
    pub copy_success_display: Duration,
    pub copy_failure_display: Duration,
    /// Image and prompt statuses fall back to idle right after the terminal
    /// status unless a display delay is configured.
    pub image_status_display: Duration,
    pub prompt_status_display: Duration,
    pub lead_submit_delay: Duration,
    pub lead_success_display: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autoplay_interval: DEFAULT_AUTOPLAY_INTERVAL,
            copy_success_display: Duration::from_millis(2000),
            copy_failure_display: Duration::from_millis(3000),
            image_status_display: Duration::ZERO,
            prompt_status_display: Duration::ZERO,
            lead_submit_delay: Duration::from_millis(1500),
            lead_success_display: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("banner engine is not running")]
    Stopped,
    #[error("banner engine task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub offers: Vec<Offer>,
    pub current_index: Option<usize>,
    pub paused: bool,
    pub modal_open: bool,
    pub autoplay_running: bool,
    pub tasks: Vec<(TaskKey, TaskStatus)>,
    pub lead_state: LeadModalState,
    pub captured_leads: Vec<CapturedLead>,
}

impl EngineSnapshot {
    pub fn current_offer(&self) -> Option<&Offer> {
        self.current_index.and_then(|index| self.offers.get(index))
    }

    pub fn task_status(&self, key: &TaskKey) -> TaskStatus {
        self.tasks
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, status)| *status)
            .unwrap_or_default()
    }
}

/// Handle to a running engine task.
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<UiEvent>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Spawn the engine on the current tokio runtime with `offers` as the
    /// initial campaign list.
    pub fn spawn(
        config: EngineConfig,
        backends: GenerationBackends,
        clipboard: Arc<dyn ClipboardSink>,
        store: CampaignStore,
        offers: Vec<Offer>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER_CAPACITY);

        let engine = Engine {
            config,
            backends,
            clipboard,
            store,
            carousel: CarouselController::new(offers),
            autoplay: Autoplay::default(),
            autoplay_timer: None,
            tracker: GenerationTracker::default(),
            revert_timers: HashMap::new(),
            lead: LeadCapture::default(),
            lead_timer: None,
            internal_tx,
            events: events.clone(),
        };

        let task = tokio::spawn(run(engine, cmd_rx, internal_rx));
        Self {
            commands: cmd_tx,
            events,
            task,
        }
    }

    pub fn commands(&self) -> mpsc::Sender<Command> {
        self.commands.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    pub async fn send(&self, cmd: Command) -> Result<(), EngineError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| EngineError::Stopped)
    }

    pub async fn snapshot(&self) -> Result<EngineSnapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| EngineError::Stopped)
    }

    pub async fn shutdown(self) -> Result<(), EngineError> {
        // A closed queue means the engine already exited; joining still
        // surfaces a panic if there was one.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task.await?;
        Ok(())
    }
}

enum Internal {
    AutoplayTick { epoch: u64 },
    TaskFinished { ticket: TaskTicket, outcome: TaskOutcome },
    RevertStatus { ticket: TaskTicket },
    LeadSubmitted { attempt: u64 },
    LeadConfirmationShown { attempt: u64 },
}

enum TaskOutcome {
    Copy {
        course: String,
        result: Result<CopyBundle>,
    },
    Image {
        result: Result<Option<GeneratedImage>>,
    },
    Prompt {
        result: Result<Option<String>>,
    },
}

struct Engine {
    config: EngineConfig,
    backends: GenerationBackends,
    clipboard: Arc<dyn ClipboardSink>,
    store: CampaignStore,
    carousel: CarouselController,
    autoplay: Autoplay,
    autoplay_timer: Option<JoinHandle<()>>,
    tracker: GenerationTracker,
    revert_timers: HashMap<TaskKey, JoinHandle<()>>,
    lead: LeadCapture,
    lead_timer: Option<JoinHandle<()>>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    events: broadcast::Sender<UiEvent>,
}

async fn run(
    mut engine: Engine,
    mut commands: mpsc::Receiver<Command>,
    mut internal: mpsc::UnboundedReceiver<Internal>,
) {
    info!(offers = engine.carousel.len(), "banner engine started");
    engine.reconcile_autoplay();

    loop {
        tokio::select! {
            biased;
            Some(event) = internal.recv() => engine.handle_internal(event),
            cmd = commands.recv() => match cmd {
                Some(Command::Shutdown) | None => break,
                Some(cmd) => engine.handle_command(cmd).await,
            },
        }
    }

    engine.stop_timers();
    info!("banner engine stopped");
}

impl Engine {
    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Next => {
                self.carousel.next();
                self.emit_slide();
            }
            Command::Previous => {
                self.carousel.previous();
                self.emit_slide();
            }
            Command::GoTo { index } => {
                self.carousel.go_to(index);
                self.emit_slide();
            }
            Command::SetHover { hovering } => {
                self.carousel.set_paused(hovering);
                self.reconcile_autoplay();
            }
            Command::OpenLeadModal => self.open_lead_modal(),
            Command::CloseLeadModal => self.close_lead_modal(),
            Command::SubmitLead { form } => match self.lead.submit(form) {
                Ok(attempt) => {
                    info!(attempt, "lead form submitted");
                    self.schedule_lead(
                        self.config.lead_submit_delay,
                        Internal::LeadSubmitted { attempt },
                    );
                }
                Err(err) => self.emit_error(ErrorCode::Validation, UiErrorContext::Lead, err.to_string()),
            },
            Command::GenerateCopy { course } => self.generate_copy(course),
            Command::GenerateImage { offer_id, course } => self.generate_image(offer_id, course),
            Command::GeneratePrompt { offer_id, course } => self.generate_prompt_text(offer_id, course),
            Command::Export { path } => self.export(path).await,
            Command::ImportFile { path } => {
                let result = self.store.import(&path).await;
                self.apply_import(result.map_err(|err| err.to_string()));
            }
            Command::ImportDocument { document } => {
                let result = storage::decode_offers(&document);
                self.apply_import(result.map_err(|err| err.to_string()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            // Handled by the run loop.
            Command::Shutdown => {}
        }
    }

    fn handle_internal(&mut self, event: Internal) {
        match event {
            Internal::AutoplayTick { epoch } => {
                if !self.autoplay.accepts(epoch) {
                    debug!(epoch, "dropping stale autoplay tick");
                    return;
                }
                self.carousel.next();
                self.emit_slide();
            }
            Internal::TaskFinished { ticket, outcome } => self.complete_task(ticket, outcome),
            Internal::RevertStatus { ticket } => {
                if self.tracker.revert(&ticket) {
                    self.revert_timers.remove(&ticket.key);
                    self.emit_status(&ticket.key, TaskStatus::Idle);
                }
            }
            Internal::LeadSubmitted { attempt } => {
                let Some(lead) = self.lead.complete_submission(attempt, Utc::now()) else {
                    debug!(attempt, "dropping stale lead submission");
                    return;
                };
                info!(course = %lead.course_interest, "lead captured");
                self.emit(UiEvent::LeadCaptured(lead));
                self.schedule_lead(
                    self.config.lead_success_display,
                    Internal::LeadConfirmationShown { attempt },
                );
            }
            Internal::LeadConfirmationShown { attempt } => {
                if self.lead.finish(attempt) {
                    self.lead_timer = None;
                    self.release_modal();
                }
            }
        }
    }

    // ---- carousel / autoplay ----

    fn reconcile_autoplay(&mut self) {
        let change = self.autoplay.reconcile(
            self.carousel.paused(),
            self.carousel.modal_open(),
            self.carousel.len(),
        );

        match change {
            Some(AutoplayChange::Started { epoch }) => {
                self.arm_autoplay(epoch);
                self.emit(UiEvent::AutoplayChanged { running: true });
            }
            Some(AutoplayChange::Rearmed { epoch }) => self.arm_autoplay(epoch),
            Some(AutoplayChange::Stopped) => {
                if let Some(timer) = self.autoplay_timer.take() {
                    timer.abort();
                }
                self.emit(UiEvent::AutoplayChanged { running: false });
            }
            None => {}
        }
    }

    fn arm_autoplay(&mut self, epoch: u64) {
        if let Some(timer) = self.autoplay_timer.take() {
            timer.abort();
        }

        let period = self.config.autoplay_interval;
        let tx = self.internal_tx.clone();
        self.autoplay_timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Internal::AutoplayTick { epoch }).is_err() {
                    break;
                }
            }
        }));
        debug!(epoch, period_ms = period.as_millis() as u64, "autoplay timer armed");
    }

    fn offers_changed(&mut self) {
        self.emit(UiEvent::OffersChanged {
            total: self.carousel.len(),
        });
        self.emit_slide();
        self.reconcile_autoplay();
    }

    // ---- lead modal ----

    fn open_lead_modal(&mut self) {
        if !self.lead.open(self.carousel.course_interest()) {
            return;
        }
        self.carousel.set_paused(true);
        self.carousel.set_modal_open(true);
        self.reconcile_autoplay();
        self.emit(UiEvent::LeadModalChanged {
            open: true,
            course_interest: self.carousel.course_interest().to_string(),
        });
    }

    fn close_lead_modal(&mut self) {
        if !self.lead.close() {
            return;
        }
        if let Some(timer) = self.lead_timer.take() {
            timer.abort();
        }
        self.release_modal();
    }

    fn release_modal(&mut self) {
        self.carousel.set_modal_open(false);
        self.carousel.set_paused(false);
        self.reconcile_autoplay();
        self.emit(UiEvent::LeadModalChanged {
            open: false,
            course_interest: self.carousel.course_interest().to_string(),
        });
    }

    fn schedule_lead(&mut self, delay: Duration, event: Internal) {
        if let Some(timer) = self.lead_timer.take() {
            timer.abort();
        }
        self.lead_timer = Some(self.schedule(delay, event));
    }

    // ---- generation tasks ----

    fn begin_task(&mut self, key: TaskKey, context: UiErrorContext) -> Option<TaskTicket> {
        match self.tracker.begin(key) {
            Ok(ticket) => {
                if let Some(timer) = self.revert_timers.remove(&ticket.key) {
                    timer.abort();
                }
                info!(task = %ticket.key, generation = ticket.generation, "generation task started");
                self.emit_status(&ticket.key, TaskStatus::Running);
                Some(ticket)
            }
            Err(err) => {
                warn!("rejecting duplicate generation request: {err}");
                self.emit_error(ErrorCode::Validation, context, err.to_string());
                None
            }
        }
    }

    fn generate_copy(&mut self, course_name: String) {
        let course = course_name.trim().to_string();
        if course.is_empty() {
            debug!("ignoring copy generation for blank course name");
            return;
        }

        let Some(ticket) = self.begin_task(TaskKey::copy(), UiErrorContext::GenerateCopy) else {
            return;
        };

        let copy = Arc::clone(&self.backends.copy);
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = copy.generate_copy(&course).await;
            let _ = tx.send(Internal::TaskFinished {
                ticket,
                outcome: TaskOutcome::Copy { course, result },
            });
        });
    }

    fn generate_image(&mut self, offer_id: OfferId, course: String) {
        let Some(images) = self.backends.images.clone() else {
            self.emit_error(
                ErrorCode::MissingConfiguration,
                UiErrorContext::GenerateImage,
                "API key missing",
            );
            return;
        };
        if !self.has_offer(&offer_id) {
            self.emit_error(
                ErrorCode::Validation,
                UiErrorContext::GenerateImage,
                format!("unknown offer '{offer_id}'"),
            );
            return;
        }

        let Some(ticket) =
            self.begin_task(TaskKey::image(offer_id), UiErrorContext::GenerateImage)
        else {
            return;
        };

        let request = ImageRequest {
            prompt: prompts::studio_photo_prompt(&course),
            options: ImageOptions::default(),
        };
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = images.generate_image(&request).await;
            let _ = tx.send(Internal::TaskFinished {
                ticket,
                outcome: TaskOutcome::Image { result },
            });
        });
    }

    fn generate_prompt_text(&mut self, offer_id: OfferId, course: String) {
        let Some(prompt_writer) = self.backends.prompts.clone() else {
            self.emit_error(
                ErrorCode::MissingConfiguration,
                UiErrorContext::GeneratePrompt,
                "API key missing",
            );
            return;
        };
        if !self.has_offer(&offer_id) {
            self.emit_error(
                ErrorCode::Validation,
                UiErrorContext::GeneratePrompt,
                format!("unknown offer '{offer_id}'"),
            );
            return;
        }

        let Some(ticket) =
            self.begin_task(TaskKey::prompt(offer_id), UiErrorContext::GeneratePrompt)
        else {
            return;
        };

        let brief = prompts::photo_brief_prompt(&course);
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = prompt_writer.generate_text(&brief).await;
            let _ = tx.send(Internal::TaskFinished {
                ticket,
                outcome: TaskOutcome::Prompt { result },
            });
        });
    }

    fn complete_task(&mut self, ticket: TaskTicket, outcome: TaskOutcome) {
        if !self.tracker.is_current(&ticket) {
            debug!(task = %ticket.key, generation = ticket.generation, "dropping stale generation result");
            return;
        }

        match outcome {
            TaskOutcome::Copy { course, result } => match result {
                Ok(bundle) => {
                    let offer = offer_from_copy(&course, bundle);
                    let offer_id = offer.id.clone();
                    self.carousel.append_offer(offer);
                    info!(offer_id = %offer_id, course = %course, "campaign created");
                    self.emit(UiEvent::OfferCreated { offer_id, course });
                    self.offers_changed();
                    self.finish_task(&ticket, TaskStatus::Succeeded, self.config.copy_success_display);
                }
                Err(err) => {
                    warn!(course = %course, "copy generation failed: {err:#}");
                    self.emit_error(
                        ErrorCode::Collaborator,
                        UiErrorContext::GenerateCopy,
                        format!("{err:#}"),
                    );
                    self.finish_task(&ticket, TaskStatus::Failed, self.config.copy_failure_display);
                }
            },
            TaskOutcome::Image { result } => {
                let display = self.config.image_status_display;
                let Some(offer_id) = ticket.key.target.clone() else {
                    self.finish_task(&ticket, TaskStatus::Failed, display);
                    return;
                };

                match result {
                    Ok(Some(image)) if !image.is_empty() => {
                        if self.apply_image(&offer_id, data_uri(&image)) {
                            info!(offer_id = %offer_id, bytes = image.bytes.len(), "campaign image updated");
                            self.emit(UiEvent::ImageUpdated { offer_id });
                            self.finish_task(&ticket, TaskStatus::Succeeded, display);
                        } else {
                            self.emit_error(
                                ErrorCode::Validation,
                                UiErrorContext::GenerateImage,
                                format!("offer '{offer_id}' was removed before its image arrived"),
                            );
                            self.finish_task(&ticket, TaskStatus::Failed, display);
                        }
                    }
                    Ok(_) => {
                        warn!(offer_id = %offer_id, "image generation returned no image");
                        self.emit_error(
                            ErrorCode::Collaborator,
                            UiErrorContext::GenerateImage,
                            "Could not generate image.",
                        );
                        self.finish_task(&ticket, TaskStatus::Failed, display);
                    }
                    Err(err) => {
                        warn!(offer_id = %offer_id, "image generation failed: {err:#}");
                        self.emit_error(
                            ErrorCode::Collaborator,
                            UiErrorContext::GenerateImage,
                            format!(
                                "Erro ao gerar imagem. Tente usar o botão 'Prompt' e gerar externamente. ({err:#})"
                            ),
                        );
                        self.finish_task(&ticket, TaskStatus::Failed, display);
                    }
                }
            }
            TaskOutcome::Prompt { result } => {
                let display = self.config.prompt_status_display;
                let offer_id = ticket.key.target.clone();

                let failure = match result {
                    Ok(Some(text)) => match self.clipboard.write_text(&text) {
                        Ok(()) => None,
                        Err(err) => Some(format!("clipboard unavailable: {err:#}")),
                    },
                    Ok(None) => Some("Erro ao gerar prompt: empty response".to_string()),
                    Err(err) => Some(format!("Erro ao gerar prompt: {err:#}")),
                };

                match (failure, offer_id) {
                    (None, Some(offer_id)) => {
                        self.emit(UiEvent::PromptCopied { offer_id });
                        self.emit(UiEvent::Info(
                            "Prompt copiado! Cole no ChatGPT, Midjourney ou DALL-E.".to_string(),
                        ));
                        self.finish_task(&ticket, TaskStatus::Succeeded, display);
                    }
                    (None, None) => self.finish_task(&ticket, TaskStatus::Succeeded, display),
                    (Some(message), _) => {
                        warn!(task = %ticket.key, "prompt generation failed: {message}");
                        self.emit_error(
                            ErrorCode::Collaborator,
                            UiErrorContext::GeneratePrompt,
                            message,
                        );
                        self.finish_task(&ticket, TaskStatus::Failed, display);
                    }
                }
            }
        }
    }

    /// Record the terminal status, then return to idle either immediately or
    /// after `display`.
    fn finish_task(&mut self, ticket: &TaskTicket, status: TaskStatus, display: Duration) {
        if !self.tracker.finish(ticket, status) {
            return;
        }
        self.emit_status(&ticket.key, status);

        if display.is_zero() {
            if self.tracker.revert(ticket) {
                self.emit_status(&ticket.key, TaskStatus::Idle);
            }
            return;
        }

        let timer = self.schedule(
            display,
            Internal::RevertStatus {
                ticket: ticket.clone(),
            },
        );
        if let Some(previous) = self.revert_timers.insert(ticket.key.clone(), timer) {
            previous.abort();
        }
    }

    fn has_offer(&self, offer_id: &OfferId) -> bool {
        self.carousel.offers().iter().any(|offer| &offer.id == offer_id)
    }

    /// Rebuild the list with only the matching offer's image replaced.
    fn apply_image(&mut self, offer_id: &OfferId, image_uri: String) -> bool {
        if !self.has_offer(offer_id) {
            return false;
        }

        let updated: Vec<Offer> = self
            .carousel
            .offers()
            .iter()
            .map(|offer| {
                if &offer.id == offer_id {
                    offer.with_image(image_uri.clone())
                } else {
                    offer.clone()
                }
            })
            .collect();
        self.carousel.replace_all(updated);
        self.offers_changed();
        true
    }

    // ---- export / import ----

    async fn export(&mut self, path: Option<PathBuf>) {
        match self.store.export(path.as_deref(), self.carousel.offers()).await {
            Ok(path) => self.emit(UiEvent::Exported {
                path,
                count: self.carousel.len(),
            }),
            Err(err) => {
                warn!("campaign export failed: {err}");
                self.emit(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Export,
                    err.to_string(),
                )));
            }
        }
    }

    fn apply_import(&mut self, result: Result<Vec<Offer>, String>) {
        match result {
            Ok(offers) => {
                let count = offers.len();
                self.carousel.replace_all(offers);
                self.offers_changed();
                self.emit(UiEvent::Imported { count });
                self.emit(UiEvent::Info(
                    "Campanhas carregadas com sucesso!".to_string(),
                ));
            }
            Err(message) => {
                warn!("campaign import rejected: {message}");
                self.emit_error(
                    ErrorCode::Validation,
                    UiErrorContext::Import,
                    format!("Erro ao ler arquivo JSON: {message}"),
                );
            }
        }
    }

    // ---- plumbing ----

    fn schedule(&self, delay: Duration, event: Internal) -> JoinHandle<()> {
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        })
    }

    fn stop_timers(&mut self) {
        if let Some(timer) = self.autoplay_timer.take() {
            timer.abort();
        }
        if let Some(timer) = self.lead_timer.take() {
            timer.abort();
        }
        for (_, timer) in self.revert_timers.drain() {
            timer.abort();
        }
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            offers: self.carousel.offers().to_vec(),
            current_index: self.carousel.current_index(),
            paused: self.carousel.paused(),
            modal_open: self.carousel.modal_open(),
            autoplay_running: self.autoplay.is_running(),
            tasks: self.tracker.active(),
            lead_state: self.lead.state().clone(),
            captured_leads: self.lead.captured().to_vec(),
        }
    }

    fn emit(&self, event: UiEvent) {
        // No subscribers is fine: events are notifications only.
        let _ = self.events.send(event);
    }

    fn emit_slide(&self) {
        if let Some(view) = self.carousel.view() {
            self.emit(UiEvent::SlideChanged {
                index: view.index,
                total: view.total,
                offer_id: view.offer.id.clone(),
            });
        }
    }

    fn emit_status(&self, key: &TaskKey, status: TaskStatus) {
        self.emit(UiEvent::TaskStatusChanged {
            key: key.clone(),
            status,
        });
    }

    fn emit_error(&self, code: ErrorCode, context: UiErrorContext, message: impl Into<String>) {
        self.emit(UiEvent::Error(UiError::new(code, context, message)));
    }
}

/// Build a campaign from generated copy, substituting defaults for missing or
/// blank fields.
pub fn offer_from_copy(course: &str, bundle: CopyBundle) -> Offer {
    fn pick(value: Option<String>, default: &str) -> String {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    Offer {
        id: OfferId::generate(),
        course: course.to_string(),
        headline: pick(bundle.headline, DEFAULT_HEADLINE),
        subtitle: pick(bundle.subtitle, DEFAULT_SUBTITLE),
        discount: pick(bundle.discount, DEFAULT_DISCOUNT),
        cta_text: pick(bundle.cta_text, DEFAULT_CTA_TEXT),
        color_from: pick(bundle.color_from, DEFAULT_COLOR_FROM),
        color_to: pick(bundle.color_to, DEFAULT_COLOR_TO),
        image: Some(placeholder_image(course)),
    }
}

pub fn placeholder_image(course: &str) -> String {
    // Spaces become %20 rather than '+'; a literal '+' is already %2B.
    let encoded: String = url::form_urlencoded::byte_serialize(course.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("{PLACEHOLDER_IMAGE_BASE}{encoded}")
}

fn data_uri(image: &GeneratedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        STANDARD.encode(&image.bytes)
    )
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
