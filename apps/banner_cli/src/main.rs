use std::{io::BufRead, path::PathBuf, sync::Arc, thread};

use anyhow::{Context, Result};
use banner_core::{dispatch_command, Command, EngineHandle, EngineSnapshot, UiEvent};
use clap::{Parser, Subcommand};
use genai_client::GenerationBackends;
use shared::domain::{OfferId, TaskStatus};
use storage::CampaignStore;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod clipboard;
mod config;
mod console;

use clipboard::SystemClipboard;
use console::{ConsoleInput, HELP};

#[derive(Parser, Debug)]
#[command(name = "banner", about = "Vestibular campaign banner console")]
struct Args {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Default destination for `export` without a path.
    #[arg(long)]
    export_path: Option<PathBuf>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Interactive console (default).
    Run,
    /// Write the built-in campaigns to PATH.
    Export { path: PathBuf },
    /// Check that PATH is an importable campaign file.
    Validate { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config)?;
    if let Some(path) = args.export_path {
        settings.export_path = path;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = CampaignStore::new(settings.export_path.clone());
    match args.mode.unwrap_or(Mode::Run) {
        Mode::Run => run_console(settings, store).await,
        Mode::Export { path } => {
            let offers = storage::default_offers();
            let written = store.export(Some(path.as_path()), &offers).await?;
            println!("wrote {} campaigns to {}", offers.len(), written.display());
            Ok(())
        }
        Mode::Validate { path } => {
            let offers = store
                .import(&path)
                .await
                .with_context(|| format!("{} is not a valid campaign file", path.display()))?;
            println!("{}: {} campaigns", path.display(), offers.len());
            for offer in &offers {
                println!("  [{}] {} - {}", offer.id, offer.course, offer.headline);
            }
            Ok(())
        }
    }
}

async fn run_console(settings: config::Settings, store: CampaignStore) -> Result<()> {
    let backends = GenerationBackends::from_config(settings.gemini_config())
        .context("failed to configure generation backends")?;
    let engine = EngineHandle::spawn(
        settings.engine_config(),
        backends,
        Arc::new(SystemClipboard),
        store,
        storage::default_offers(),
    );
    let mut events = engine.subscribe_events();
    let cmd_tx = engine.commands();

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(input_tx);
    println!("{HELP}");

    let mut status = String::new();
    loop {
        tokio::select! {
            input = input_rx.recv() => {
                let Some(input) = input else { break };
                let cmd = match input {
                    ConsoleInput::Quit => break,
                    ConsoleInput::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    ConsoleInput::Show => {
                        print_snapshot(&engine.snapshot().await?);
                        continue;
                    }
                    ConsoleInput::ImageAt(index) => {
                        match slide_target(&engine.snapshot().await?, index) {
                            Some((offer_id, course)) => Command::GenerateImage { offer_id, course },
                            None => {
                                println!("no slide {index}");
                                continue;
                            }
                        }
                    }
                    ConsoleInput::PromptAt(index) => {
                        match slide_target(&engine.snapshot().await?, index) {
                            Some((offer_id, course)) => Command::GeneratePrompt { offer_id, course },
                            None => {
                                println!("no slide {index}");
                                continue;
                            }
                        }
                    }
                    ConsoleInput::Engine(cmd) => cmd,
                };
                if !dispatch_command(&cmd_tx, cmd, &mut status) {
                    println!("{status}");
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "console fell behind engine events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("shutting down banner engine");
    engine.shutdown().await?;
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::UnboundedSender<ConsoleInput>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match console::parse_line(&line) {
                Ok(Some(input)) => {
                    if input_tx.send(input).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
        // EOF ends the session.
        let _ = input_tx.send(ConsoleInput::Quit);
    });
}

fn slide_target(
    snapshot: &EngineSnapshot,
    index: usize,
) -> Option<(OfferId, String)> {
    snapshot
        .offers
        .get(index)
        .map(|offer| (offer.id.clone(), offer.course.clone()))
}

fn print_snapshot(snapshot: &EngineSnapshot) {
    match snapshot.current_index {
        Some(index) => println!("slide {}/{}", index + 1, snapshot.offers.len()),
        None => println!("no campaigns"),
    }
    for (index, offer) in snapshot.offers.iter().enumerate() {
        let marker = if Some(index) == snapshot.current_index { '>' } else { ' ' };
        println!(
            "{marker} {index}: [{}] {} | {} | {} | {}",
            offer.id, offer.course, offer.headline, offer.discount, offer.cta_text
        );
    }
    println!(
        "autoplay: {} (paused={}, lead form open={})",
        if snapshot.autoplay_running { "running" } else { "stopped" },
        snapshot.paused,
        snapshot.modal_open
    );
    for (key, status) in &snapshot.tasks {
        println!("task {key}: {status:?}");
    }
    println!("captured leads: {}", snapshot.captured_leads.len());
}

fn print_event(event: &UiEvent) {
    match event {
        UiEvent::SlideChanged {
            index,
            total,
            offer_id,
        } => println!("slide {}/{} [{offer_id}]", index + 1, total),
        UiEvent::OffersChanged { total } => println!("{total} campaigns"),
        UiEvent::AutoplayChanged { running } => {
            println!("autoplay {}", if *running { "resumed" } else { "paused" })
        }
        UiEvent::TaskStatusChanged { key, status } => match status {
            TaskStatus::Running => println!("{key}: running"),
            TaskStatus::Succeeded => println!("{key}: done"),
            TaskStatus::Failed => println!("{key}: failed"),
            TaskStatus::Idle => {}
        },
        UiEvent::OfferCreated { offer_id, course } => {
            println!("new campaign [{offer_id}] for {course}")
        }
        UiEvent::ImageUpdated { offer_id } => println!("image updated for [{offer_id}]"),
        UiEvent::PromptCopied { offer_id } => println!("prompt for [{offer_id}] copied"),
        UiEvent::LeadModalChanged {
            open,
            course_interest,
        } => {
            if *open {
                println!("lead form open: {course_interest}");
            } else {
                println!("lead form closed");
            }
        }
        UiEvent::LeadCaptured(lead) => println!(
            "lead captured: {} <{}> for {}",
            lead.form.name, lead.form.email, lead.course_interest
        ),
        UiEvent::Exported { path, count } => {
            println!("exported {count} campaigns to {}", path.display())
        }
        UiEvent::Imported { count } => println!("imported {count} campaigns"),
        UiEvent::Info(message) => println!("{message}"),
        UiEvent::Error(err) => eprintln!("error ({}): {}", err.code(), err.message()),
    }
}
