//! # Interactive Session
//!
//! Wires the process-backed services, the registry and the dispatcher
//! together, then feeds key presses to the dispatcher until the terminate
//! key (or SIGINT while raw capture is suspended) ends the session.
//!
//! ## Input States
//!
//! - **Capturing**: key events are read and dispatched in arrival order.
//! - **Suspended**: a child owns the terminal. Key events are not read;
//!   the loop waits for capture to resume. SIGINT still terminates.

use std::io;
use std::ops::ControlFlow;
use std::sync::{Arc, OnceLock};

use crossterm::event::{Event, EventStream};
use futures::{Stream, StreamExt};
use log::{error, info, warn};
use tokio::sync::watch;

use crate::core::config::ResolvedConfig;
use crate::core::dispatch::{Dispatch, Dispatcher};
use crate::core::key::KeyToken;
use crate::core::platform::{Platform, ProcessMode};
use crate::core::registry::CommandRegistry;
use crate::services::cli::{CliPipeline, DirProject, RealFs, SessionSupervisor, TokioSpawner};
use crate::services::{Console, HostEnv, LiveSyncOptions, Services, Tone};
use crate::terminal::console::StdoutConsole;
use crate::terminal::event::to_key_token;
use crate::terminal::{RawInput, RawModeGuard};

pub const WELCOME_MESSAGE: &str = "Press ? for keyboard shortcuts, ctrl+c to quit.";

/// Dispatches one key; `Break` means the session is over.
///
/// Started commands are not awaited: the dispatcher's gate tracks them.
pub fn handle_key(dispatcher: &Dispatcher, key: KeyToken) -> ControlFlow<()> {
    match dispatcher.dispatch(key) {
        Dispatch::Terminate => ControlFlow::Break(()),
        _ => ControlFlow::Continue(()),
    }
}

pub async fn run(config: ResolvedConfig, platform: Platform, mode: ProcessMode) -> io::Result<()> {
    let input = Arc::new(RawInput::enable()?);
    let _raw_mode = RawModeGuard::new(Arc::clone(&input));

    let console: Arc<dyn Console> = Arc::new(StdoutConsole);
    let host = HostEnv::detect(config.cli.clone());
    let supervisor = Arc::new(SessionSupervisor::new(
        config.cli.clone(),
        config.project_dir.clone(),
        mode,
        host.os,
        Arc::clone(&console),
    ));
    let pipeline = Arc::new(CliPipeline::new(
        config.cli.clone(),
        config.project_dir.clone(),
        input.clone(),
    ));

    let services = Arc::new(Services {
        start: supervisor.clone(),
        live_sync: supervisor.clone(),
        watcher: supervisor.clone(),
        prepare: pipeline.clone(),
        install: pipeline,
        project: Arc::new(DirProject::new(
            config.project_dir.clone(),
            config.platforms_dir.clone(),
        )),
        processes: Arc::new(TokioSpawner::new(config.project_dir.clone())),
        fs: Arc::new(RealFs),
        console: Arc::clone(&console),
        input: input.clone(),
        host,
        registry: OnceLock::new(),
    });

    let registry = Arc::new(CommandRegistry::with_defaults());
    services.attach_registry(Arc::clone(&registry));
    info!("Registered {} key commands", registry.len());
    let dispatcher = Dispatcher::new(registry, services, platform, mode);

    if mode != ProcessMode::Start
        && let Err(e) = supervisor.launch(platform, Vec::new(), LiveSyncOptions::default())
    {
        error!("Failed to start the {} session: {}", platform, e);
        console.error(&format!("Could not start the session: {e}"));
    }

    console.line(Tone::Muted, WELCOME_MESSAGE);
    let result = event_loop(
        &dispatcher,
        EventStream::new(),
        input.subscribe(),
        tokio::signal::ctrl_c(),
    )
    .await;
    info!("Session ended");
    result
}

/// Reads keys until terminate, SIGINT (`interrupt`) or the end of `events`.
/// While `suspended` is `true` no events are read.
async fn event_loop<S, F>(
    dispatcher: &Dispatcher,
    mut events: S,
    mut suspended: watch::Receiver<bool>,
    interrupt: F,
) -> io::Result<()>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
    F: Future,
{
    tokio::pin!(interrupt);

    loop {
        if *suspended.borrow_and_update() {
            tokio::select! {
                changed = suspended.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                }
                _ = &mut interrupt => {
                    info!("SIGINT while input was suspended");
                    return Ok(());
                }
            }
            continue;
        }

        tokio::select! {
            next = events.next() => match next {
                Some(Ok(event)) => {
                    if let Some(key) = to_key_token(&event)
                        && handle_key(dispatcher, key).is_break()
                    {
                        return Ok(());
                    }
                }
                Some(Err(e)) => {
                    warn!("Terminal event stream failed: {}", e);
                    return Err(e);
                }
                None => return Ok(()),
            },
            changed = suspended.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = &mut interrupt => {
                info!("SIGINT received");
                return Ok(());
            }
        }
    }
}
