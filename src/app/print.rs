//! Non-interactive rendering for `--print`.
//!
//! Goes through the same bridge as the terminal viewer: wait for the parser, emit once,
//! take the matching response.

use crate::config::Config;
use crate::error::{FountviewError, Result};
use crate::parser::inline::escape_html;
use crate::parser::ParserLoader;
use crate::render::bridge::{spawn_render_bridge, wait_until_settled};
use crate::render::port::{Delivery, RequestPort};
use crate::render::protocol::{BridgeStatus, RenderEvent};
use std::sync::Arc;

/// Render `text` to markup once the parser is ready.
///
/// A parser fault comes back as [`FountviewError::Parse`]; a parser that never loads as
/// [`FountviewError::BridgeUnavailable`].
pub async fn render_document(
    config: &Config,
    loader: Arc<dyn ParserLoader>,
    text: &str,
) -> Result<String> {
    let port = RequestPort::new();
    let mut channels = spawn_render_bridge(loader, &config.bridge, port.clone());

    match wait_until_settled(&mut channels.status).await {
        BridgeStatus::Ready => {}
        BridgeStatus::Failed(reason) => return Err(FountviewError::bridge(reason)),
        BridgeStatus::Loading => {
            return Err(FountviewError::bridge("render bridge never became ready"))
        }
    }

    let Delivery::Accepted(request_id) = port.emit(text) else {
        return Err(FountviewError::bridge("render bridge stopped listening"));
    };

    while let Some(event) = channels.events.recv().await {
        if event.request_id() != request_id {
            continue;
        }
        return match event {
            RenderEvent::Rendered { html, .. } => Ok(html),
            RenderEvent::Failed { error, .. } => Err(error.into()),
        };
    }

    Err(FountviewError::bridge(
        "render bridge exited without answering",
    ))
}

/// Wrap rendered markup in a minimal HTML page.
pub fn standalone_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}
