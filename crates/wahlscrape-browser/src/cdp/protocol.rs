//! CDP wire messages.
//!
//! Outgoing commands carry an `id`; Chrome answers with a message echoing it
//! (a reply) or pushes messages with a `method` and no `id` (an event).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolFault {
    pub code: i64,
    pub message: String,
}

/// Any message read from the socket, before routing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<ProtocolFault>,
    method: Option<String>,
    #[serde(default)]
    params: Value,
    session_id: Option<String>,
}

/// Event pushed by the browser.
#[derive(Debug, Clone)]
pub struct Event {
    pub method: String,
    pub params: Value,
    pub session_id: Option<String>,
}

/// A decoded incoming message.
#[derive(Debug)]
pub enum Incoming {
    Reply {
        id: u64,
        outcome: Result<Value, ProtocolFault>,
    },
    Event(Event),
}

impl Incoming {
    /// Decode one text frame. Messages that are neither reply nor event
    /// yield `Ok(None)`.
    pub fn parse(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let raw: RawMessage = serde_json::from_str(text)?;
        Ok(match (raw.id, raw.method) {
            (Some(id), _) => Some(Incoming::Reply {
                id,
                outcome: match raw.error {
                    Some(fault) => Err(fault),
                    None => Ok(raw.result.unwrap_or(Value::Null)),
                },
            }),
            (None, Some(method)) => Some(Incoming::Event(Event {
                method,
                params: raw.params,
                session_id: raw.session_id,
            })),
            (None, None) => None,
        })
    }
}

/// `/json/version` answer. Chrome uses mixed-case keys here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// `Page.javascriptDialogOpening` parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogOpening {
    pub message: String,
    #[serde(rename = "type")]
    pub dialog_type: String,
}

pub const DIALOG_OPENING_EVENT: &str = "Page.javascriptDialogOpening";

impl Event {
    /// Message of an opened JavaScript dialog.
    pub fn dialog_message(&self) -> Option<String> {
        if self.method != DIALOG_OPENING_EVENT {
            return None;
        }
        serde_json::from_value::<DialogOpening>(self.params.clone())
            .ok()
            .map(|d| d.message)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
