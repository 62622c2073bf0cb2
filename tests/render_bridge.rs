use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tokio::time::{timeout, Duration};

use fountview::config::BridgeConfig;
use fountview::error::{FountviewError, ParseError, Result};
use fountview::parser::{FountainParser, ParserLoader, ScreenplayParser};
use fountview::render::bridge::{spawn_render_bridge, wait_until_settled, BridgeChannels};
use fountview::render::{BridgeStatus, Delivery, RenderEvent, RequestPort};

const TIMEOUT_MS: u64 = 500;

/// Loader that blocks until the test opens the gate.
struct GatedLoader {
    gate: Arc<Notify>,
}

#[async_trait]
impl ParserLoader for GatedLoader {
    async fn load(&self) -> Result<Arc<dyn ScreenplayParser>> {
        self.gate.notified().await;
        Ok(Arc::new(FountainParser::default()))
    }
}

struct FailingLoader {
    calls: AtomicU32,
}

#[async_trait]
impl ParserLoader for FailingLoader {
    async fn load(&self) -> Result<Arc<dyn ScreenplayParser>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FountviewError::parser_load("module not found"))
    }
}

fn bridge_config() -> BridgeConfig {
    BridgeConfig {
        load_retries: 2,
        retry_backoff_ms: 1,
        load_delay_ms: 0,
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<RenderEvent>) -> RenderEvent {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("bridge response timed out")
        .expect("bridge channel closed unexpectedly")
}

async fn ready_bridge() -> (RequestPort, BridgeChannels) {
    let gate = Arc::new(Notify::new());
    gate.notify_one();
    let port = RequestPort::new();
    let mut channels = spawn_render_bridge(
        Arc::new(GatedLoader { gate }),
        &bridge_config(),
        port.clone(),
    );
    let status = timeout(
        Duration::from_millis(TIMEOUT_MS),
        wait_until_settled(&mut channels.status),
    )
    .await
    .expect("bridge never settled");
    assert_eq!(status, BridgeStatus::Ready);
    (port, channels)
}

fn accepted(delivery: Delivery) -> u64 {
    match delivery {
        Delivery::Accepted(request_id) => request_id,
        Delivery::Dropped => panic!("request was dropped by a ready bridge"),
    }
}

#[tokio::test]
async fn requests_before_ready_are_never_served() {
    let gate = Arc::new(Notify::new());
    let port = RequestPort::new();
    let mut channels = spawn_render_bridge(
        Arc::new(GatedLoader {
            gate: Arc::clone(&gate),
        }),
        &bridge_config(),
        port.clone(),
    );

    assert_eq!(*channels.status.borrow(), BridgeStatus::Loading);
    assert_eq!(port.emit("INT. ROOM\n"), Delivery::Dropped);
    assert!(!port.is_subscribed());

    gate.notify_one();
    assert_eq!(
        wait_until_settled(&mut channels.status).await,
        BridgeStatus::Ready
    );
    assert!(port.is_subscribed());

    // The early request left nothing behind
    assert!(
        timeout(Duration::from_millis(50), channels.events.recv())
            .await
            .is_err()
    );

    let request_id = accepted(port.emit("EXT. FIELD - NIGHT\n"));
    assert_eq!(request_id, 1);
    match next_event(&mut channels.events).await {
        RenderEvent::Rendered { request_id, html } => {
            assert_eq!(request_id, 1);
            assert!(html.contains("EXT. FIELD - NIGHT"));
            assert!(!html.contains("INT. ROOM"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn dialogue_renders_to_markup() {
    let (port, mut channels) = ready_bridge().await;

    let request_id = accepted(port.emit("KANE\nHello.\n"));
    match next_event(&mut channels.events).await {
        RenderEvent::Rendered { request_id: id, html } => {
            assert_eq!(id, request_id);
            assert!(html.contains("class=\"dialogue\""));
            assert!(html.contains("<h4 class=\"character\">KANE</h4>"));
            assert!(html.contains("<p class=\"line\">Hello.</p>"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn responses_follow_request_order() {
    let (port, mut channels) = ready_bridge().await;

    let ids: Vec<u64> = (1..=25)
        .map(|scene| accepted(port.emit(format!("INT. ROOM {scene}\n"))))
        .collect();
    assert_eq!(ids, (1..=25).collect::<Vec<u64>>());

    for scene in 1..=25u64 {
        match next_event(&mut channels.events).await {
            RenderEvent::Rendered { request_id, html } => {
                assert_eq!(request_id, scene);
                assert!(html.contains(&format!(">INT. ROOM {scene}</h3>")));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

#[tokio::test]
async fn parse_fault_is_reported_and_bridge_keeps_serving() {
    let (port, mut channels) = ready_bridge().await;

    accepted(port.emit("KANE\nHel\u{0}lo.\n"));
    match next_event(&mut channels.events).await {
        RenderEvent::Failed { request_id, error } => {
            assert_eq!(request_id, 1);
            assert_eq!(
                error,
                ParseError::ControlCharacter {
                    code: 0,
                    line: 2,
                    column: 4,
                }
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }

    accepted(port.emit("RIPLEY\nWhat's wrong?\n"));
    match next_event(&mut channels.events).await {
        RenderEvent::Rendered { request_id, html } => {
            assert_eq!(request_id, 2);
            assert!(html.contains("RIPLEY"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(*channels.status.borrow(), BridgeStatus::Ready);
}

#[tokio::test]
async fn empty_document_renders_empty_script() {
    let (port, mut channels) = ready_bridge().await;

    accepted(port.emit(""));
    match next_event(&mut channels.events).await {
        RenderEvent::Rendered { html, .. } => assert_eq!(html, "<div class=\"script\"></div>"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn load_failure_leaves_bridge_inert() {
    let loader = Arc::new(FailingLoader {
        calls: AtomicU32::new(0),
    });
    let port = RequestPort::new();
    let mut channels = spawn_render_bridge(loader.clone(), &bridge_config(), port.clone());

    match wait_until_settled(&mut channels.status).await {
        BridgeStatus::Failed(reason) => assert!(reason.contains("module not found")),
        other => panic!("unexpected status: {other:?}"),
    }

    let result = timeout(Duration::from_millis(TIMEOUT_MS), channels.task)
        .await
        .expect("bridge task did not finish")
        .expect("bridge task panicked");
    assert!(matches!(result, Err(FountviewError::ParserLoad { .. })));

    // One initial attempt plus the configured retries
    assert_eq!(loader.calls.load(Ordering::SeqCst), 3);
    assert!(!port.is_subscribed());
    assert_eq!(port.emit("KANE\nHello.\n"), Delivery::Dropped);
}

#[tokio::test]
async fn bridge_stops_when_events_receiver_is_dropped() {
    let (port, channels) = ready_bridge().await;
    let BridgeChannels { events, task, .. } = channels;

    drop(events);

    let result = timeout(Duration::from_millis(TIMEOUT_MS), task)
        .await
        .expect("bridge task did not stop")
        .expect("bridge task panicked");
    assert!(result.is_ok());
    assert!(!port.is_subscribed());
}
