//! Cross-document messaging with the page hosting the widget frame.
//!
//! The host is semi-trusted: inbound messages are acted on only when the
//! sender origin is on the allow-list, everything else is dropped silently.

use gloo_utils::{document, window};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use web_sys::{MessageEvent, Window};

/// Messages the widget sends to the hosting page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "RESIZE_IFRAME")]
    ResizeIframe { height: i32 },
    #[serde(rename = "SCROLL_TO_TOP")]
    ScrollToTop { path: String },
}

/// Messages the hosting page may send to the widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    #[serde(rename = "GET_CONTENT_HEIGHT")]
    GetContentHeight,
}

/// Whether `origin` may drive the bridge. The widget's own origin is
/// accepted alongside the fixed allow-list.
pub fn origin_allowed(origin: &str, allowed: &[&str], self_origin: &str) -> bool {
    !origin.is_empty() && (origin == self_origin || allowed.contains(&origin))
}

/// The parent window, when the widget actually runs inside a frame.
fn embedding_parent() -> Option<Window> {
    let own = window();
    match own.parent() {
        Ok(Some(parent)) if parent != own => Some(parent),
        _ => None,
    }
}

/// Post a message to the hosting page. A no-op outside a frame.
pub fn post_to_parent(message: &OutboundMessage) {
    let Some(parent) = embedding_parent() else {
        return;
    };
    match serde_wasm_bindgen::to_value(message) {
        Ok(payload) => {
            if parent.post_message(&payload, "*").is_err() {
                warn!("embed: failed to post {message:?} to parent");
            }
        }
        Err(err) => warn!("embed: could not serialize {message:?}: {err}"),
    }
}

/// Scroll the widget back to its origin and tell the host to follow.
pub fn scroll_to_top(path: &str) {
    post_to_parent(&OutboundMessage::ScrollToTop {
        path: path.to_owned(),
    });
    window().scroll_to_with_x_and_y(0.0, 0.0);
}

/// Rendered height of the widget document.
pub fn content_height() -> i32 {
    document().document_element().map_or(0, |el| el.scroll_height())
}

/// React to one inbound `message` event, enforcing the origin allow-list.
pub fn handle_inbound(event: &MessageEvent, allowed: &[&str], self_origin: &str) {
    let origin = event.origin();
    if !origin_allowed(&origin, allowed, self_origin) {
        debug!("embed: dropping message from unrecognized origin {origin:?}");
        return;
    }
    let message = match serde_wasm_bindgen::from_value::<InboundMessage>(event.data()) {
        Ok(message) => message,
        Err(_) => {
            debug!("embed: dropping message the widget does not understand");
            return;
        }
    };
    match message {
        InboundMessage::GetContentHeight => {
            post_to_parent(&OutboundMessage::ResizeIframe {
                height: content_height(),
            });
        }
    }
}
