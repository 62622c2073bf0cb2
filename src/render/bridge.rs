//! The render bridge: parser lifecycle plus the request/response relay.
//!
//! Start-up order matters. The bridge loads the parser first, then subscribes to the
//! request port, then announces [`BridgeStatus::Ready`]. Requests emitted before the
//! subscription are never seen. After that every request is parsed and answered before
//! the next one is received, so responses leave in request order, one at a time.

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::parser::{ParserHandle, ParserLoader, ScreenplayParser};
use crate::render::port::RequestPort;
use crate::render::protocol::{BridgeStatus, RenderEvent, RenderRequest};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Parse one request and build the event answering it.
pub fn handle_render_request(parser: &dyn ScreenplayParser, request: RenderRequest) -> RenderEvent {
    match parser.parse(&request.raw_text) {
        Ok(html) => RenderEvent::Rendered {
            request_id: request.request_id,
            html,
        },
        Err(error) => RenderEvent::Failed {
            request_id: request.request_id,
            error,
        },
    }
}

pub struct RenderBridge {
    handle: Arc<ParserHandle>,
    port: RequestPort,
    events: UnboundedSender<RenderEvent>,
    status: watch::Sender<BridgeStatus>,
}

impl RenderBridge {
    pub fn new(
        handle: Arc<ParserHandle>,
        port: RequestPort,
        events: UnboundedSender<RenderEvent>,
        status: watch::Sender<BridgeStatus>,
    ) -> Self {
        Self {
            handle,
            port,
            events,
            status,
        }
    }

    /// Drive the bridge until the UI stops listening.
    ///
    /// Returns the load error when the parser never becomes available; the status
    /// channel reports [`BridgeStatus::Failed`] in that case.
    pub async fn run(self) -> Result<()> {
        let parser = match self.handle.get_or_load().await {
            Ok(parser) => parser,
            Err(err) => {
                log::error!("render bridge stays inert: {err}");
                self.status.send_replace(BridgeStatus::Failed(err.to_string()));
                return Err(err);
            }
        };

        let requests = self.port.subscribe();
        self.status.send_replace(BridgeStatus::Ready);
        log::info!("render bridge ready");

        self.serve(parser, requests).await;
        log::debug!("render bridge stopped");
        Ok(())
    }

    async fn serve(
        &self,
        parser: Arc<dyn ScreenplayParser>,
        mut requests: UnboundedReceiver<RenderRequest>,
    ) {
        loop {
            let request = tokio::select! {
                biased;
                _ = self.events.closed() => break,
                request = requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            let event = handle_render_request(parser.as_ref(), request);
            if let RenderEvent::Failed { request_id, error } = &event {
                log::warn!("render request {request_id} rejected: {error}");
            }
            if self.events.send(event).is_err() {
                break;
            }
        }
    }
}

/// Channels and task handle returned by [`spawn_render_bridge`].
pub struct BridgeChannels {
    pub events: UnboundedReceiver<RenderEvent>,
    pub status: watch::Receiver<BridgeStatus>,
    pub task: JoinHandle<Result<()>>,
}

/// Start loading the parser and run the bridge in the background.
///
/// Returns immediately; the caller can build its UI while the load is in flight.
pub fn spawn_render_bridge(
    loader: Arc<dyn ParserLoader>,
    config: &BridgeConfig,
    port: RequestPort,
) -> BridgeChannels {
    let handle = Arc::new(ParserHandle::new(loader, config));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(BridgeStatus::Loading);

    let bridge = RenderBridge::new(handle, port, events_tx, status_tx);
    let task = tokio::spawn(bridge.run());

    BridgeChannels {
        events: events_rx,
        status: status_rx,
        task,
    }
}

/// Wait until the bridge leaves [`BridgeStatus::Loading`] and return the terminal status.
pub async fn wait_until_settled(status: &mut watch::Receiver<BridgeStatus>) -> BridgeStatus {
    match status.wait_for(BridgeStatus::is_terminal).await {
        Ok(settled) => settled.clone(),
        Err(_) => BridgeStatus::Failed("render bridge exited before becoming ready".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parser::FountainParser;

    fn request(request_id: u64, text: &str) -> RenderRequest {
        RenderRequest {
            request_id,
            raw_text: Arc::from(text),
        }
    }

    #[test]
    fn handle_render_request_answers_with_same_id() {
        let parser = FountainParser::default();
        match handle_render_request(&parser, request(7, "KANE\nHello.\n")) {
            RenderEvent::Rendered { request_id, html } => {
                assert_eq!(request_id, 7);
                assert!(html.contains("class=\"character\""));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn handle_render_request_surfaces_parse_fault() {
        let parser = FountainParser::default();
        assert_eq!(
            handle_render_request(&parser, request(3, "\0")),
            RenderEvent::Failed {
                request_id: 3,
                error: ParseError::ControlCharacter {
                    code: 0,
                    line: 1,
                    column: 1,
                },
            }
        );
    }

    #[test]
    fn empty_text_is_rendered() {
        let parser = FountainParser::default();
        assert!(matches!(
            handle_render_request(&parser, request(1, "")),
            RenderEvent::Rendered { .. }
        ));
    }
}
