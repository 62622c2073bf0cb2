//! Application orchestration layer
//!
//! Wires the document source, the render bridge and the terminal UI together. The bridge
//! is spawned before the UI exists so the parser loads while the first frame is drawn;
//! anything emitted before it is ready is dropped and sent again once it reports ready.

pub mod print;
pub mod runtime;

use crate::config::Config;
use crate::error::Result;
use crate::input::InputAction;
use crate::parser::ParserLoader;
use crate::render::bridge::{spawn_render_bridge, BridgeChannels};
use crate::render::port::RequestPort;
use crate::render::protocol::StartupConfig;
use crate::render::service::RenderLoopState;
use crate::render::ui::{UIRenderer, ViewState};
use crate::source::ScreenplaySource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

pub use print::{render_document, standalone_document};

/// Application orchestrator - owns the source and the renderer, delegates everything else
pub struct Application {
    config: Config,
    source: ScreenplaySource,
    ui_renderer: Box<dyn UIRenderer>,
    loader: Arc<dyn ParserLoader>,
}

impl Application {
    pub fn new(
        config: Config,
        source: ScreenplaySource,
        ui_renderer: Box<dyn UIRenderer>,
        loader: Arc<dyn ParserLoader>,
    ) -> Self {
        Self {
            config,
            source,
            ui_renderer,
            loader,
        }
    }

    /// Run the interactive viewer until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let port = RequestPort::new();
        let channels = spawn_render_bridge(
            Arc::clone(&self.loader),
            &self.config.bridge,
            port.clone(),
        );

        self.ui_renderer.initialize()?;

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread = runtime::spawn_input_thread(
            action_tx,
            Arc::clone(&shutdown),
            self.config.ui.poll_interval(),
        );

        let result = self.run_loop(port, action_rx, channels).await;

        shutdown.store(true, Ordering::SeqCst);
        let cleanup = self.ui_renderer.cleanup();
        runtime::join_input_thread(input_thread).await;

        result.and(cleanup)
    }

    /// The event loop proper, separated from terminal setup so it can be driven by tests.
    pub async fn run_loop(
        &mut self,
        port: RequestPort,
        mut actions: UnboundedReceiver<InputAction>,
        channels: BridgeChannels,
    ) -> Result<()> {
        let BridgeChannels {
            mut events,
            mut status,
            task,
        } = channels;

        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let startup = StartupConfig {
            starting_text: self.source.text().to_string(),
        };
        let mut view_state = ViewState::new(&startup, self.source.display_name(), width, height);
        let mut render_state = RenderLoopState::new(port);

        // Usually dropped: the parser is still loading at this point.
        render_state.submit(&mut view_state);
        self.ui_renderer.render(&view_state)?;

        let mut watch_tick = tokio::time::interval(self.config.ui.watch_interval());
        watch_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let watching = self.source.path().is_some();
        let mut status_open = true;

        loop {
            tokio::select! {
                action = actions.recv() => {
                    let Some(action) = action else {
                        log::debug!("input channel closed");
                        break;
                    };
                    if action == InputAction::Reload {
                        self.reload_source(&mut render_state, &mut view_state).await;
                    } else if !render_state.process_action(action, &mut view_state) {
                        break;
                    }
                }
                Some(event) = events.recv() => {
                    render_state.handle_event(event, &mut view_state);
                }
                changed = status.changed(), if status_open => match changed {
                    Ok(()) => {
                        let current = status.borrow_and_update().clone();
                        log::debug!("bridge status: {}", current.label());
                        render_state.handle_status(current, &mut view_state);
                    }
                    Err(_) => status_open = false,
                },
                _ = watch_tick.tick(), if watching => {
                    self.refresh_source(&mut render_state, &mut view_state).await;
                }
            }

            self.ui_renderer.render(&view_state)?;
        }

        task.abort();
        Ok(())
    }

    async fn reload_source(
        &mut self,
        render_state: &mut RenderLoopState,
        view_state: &mut ViewState,
    ) {
        match self.source.reload().await {
            Ok(()) => {
                view_state.set_source_text(self.source.text().to_string());
                view_state.status_line.set_message("Reloaded".to_string());
                render_state.submit(view_state);
            }
            Err(err) => {
                log::warn!("reload failed: {err}");
                view_state.status_line.set_message(format!("Reload failed: {err}"));
            }
        }
    }

    async fn refresh_source(
        &mut self,
        render_state: &mut RenderLoopState,
        view_state: &mut ViewState,
    ) {
        match self.source.refresh_if_modified().await {
            Ok(true) => {
                log::info!("{} changed on disk", self.source.display_name());
                view_state.set_source_text(self.source.text().to_string());
                view_state.status_line.clear_message();
                render_state.submit(view_state);
            }
            Ok(false) => {}
            Err(err) => {
                log::warn!("watch failed: {err}");
                view_state.status_line.set_message(format!("Watch failed: {err}"));
            }
        }
    }
}
