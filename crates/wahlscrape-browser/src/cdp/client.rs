//! CDP WebSocket client.
//!
//! One client per Chrome process. A background task reads the socket and
//! routes each frame: replies complete the matching pending call, events go
//! to the single attached page.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, Command, Event, Incoming};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type PendingCalls = Mutex<HashMap<u64, PendingCall>>;
type PageEvents = Mutex<Option<mpsc::UnboundedSender<Event>>>;

/// Upper bound for a single CDP command round trip.
pub(crate) const CALL_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) struct PendingCall {
    method: String,
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Send half of the connection, shared by the client and its page.
#[derive(Clone)]
pub(crate) struct Wire {
    sink: Arc<tokio::sync::Mutex<WsSink>>,
    pending: Arc<PendingCalls>,
    next_id: Arc<AtomicU64>,
}

impl Wire {
    /// Send a command and wait for its reply.
    pub async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = serde_json::to_string(&Command {
            id,
            method,
            params,
            session_id,
        })?;
        trace!("CDP send: {}", text);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(
            id,
            PendingCall {
                method: method.to_string(),
                tx,
            },
        );

        let sent = self.sink.lock().await.send(Message::Text(text.into())).await;
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::Closed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("{} got no reply", method)))
            }
        }
    }
}

/// Deliver one text frame to its waiting caller or to the page.
fn route(text: &str, pending: &PendingCalls, page_events: &PageEvents) {
    match Incoming::parse(text) {
        Ok(Some(Incoming::Reply { id, outcome })) => {
            let Some(call) = pending.lock().remove(&id) else {
                trace!("Reply {} arrived after its caller gave up", id);
                return;
            };
            let result = outcome.map_err(|fault| CdpError::Command {
                method: call.method,
                code: fault.code,
                message: fault.message,
            });
            let _ = call.tx.send(result);
        }
        // Browser-level events carry no session and are of no interest.
        Ok(Some(Incoming::Event(event))) if event.session_id.is_some() => {
            if let Some(tx) = page_events.lock().as_ref() {
                let _ = tx.send(event);
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to parse CDP message: {}", e),
    }
}

async fn receive_loop(mut source: WsSource, pending: Arc<PendingCalls>, page_events: Arc<PageEvents>) {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                trace!("CDP recv: {}", text);
                route(&text, &pending, &page_events);
            }
            Ok(Message::Close(_)) => {
                debug!("DevTools socket closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!("DevTools socket error: {}", e);
                break;
            }
        }
    }

    for (_, call) in pending.lock().drain() {
        let _ = call.tx.send(Err(CdpError::Closed));
    }
}

/// CDP client bound to one browser process.
pub struct CdpClient {
    wire: Wire,
    page_events: Arc<PageEvents>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at its HTTP debugging endpoint, e.g. `http://127.0.0.1:9222`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let endpoint = endpoint.trim_end_matches('/');
        let unreachable = |e: reqwest::Error| CdpError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        };

        let version: BrowserVersion = reqwest::get(format!("{}/json/version", endpoint))
            .await
            .map_err(unreachable)?
            .json()
            .await
            .map_err(unreachable)?;

        let (stream, _) = tokio_tungstenite::connect_async(version.web_socket_debugger_url.as_str()).await?;
        let (sink, source) = stream.split();
        debug!("Connected to {} at {}", version.browser, version.web_socket_debugger_url);

        let pending: Arc<PendingCalls> = Arc::default();
        let page_events: Arc<PageEvents> = Arc::default();
        let recv_task = tokio::spawn(receive_loop(source, pending.clone(), page_events.clone()));

        Ok(Self {
            wire: Wire {
                sink: Arc::new(tokio::sync::Mutex::new(sink)),
                pending,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            page_events,
            recv_task,
        })
    }

    /// Open a blank page and attach to it. Events are routed to the most
    /// recently opened page.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let created = self
            .wire
            .call(
                "Target.createTarget",
                Some(json!({ "url": "about:blank" })),
                None,
            )
            .await?;
        let target_id = created["targetId"].as_str().ok_or(CdpError::MissingField {
            method: "Target.createTarget",
            field: "targetId",
        })?;

        let attached = self
            .wire
            .call(
                "Target.attachToTarget",
                Some(json!({ "targetId": target_id, "flatten": true })),
                None,
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or(CdpError::MissingField {
                method: "Target.attachToTarget",
                field: "sessionId",
            })?
            .to_string();
        debug!("Attached to target {} as {}", target_id, session_id);

        let (tx, rx) = mpsc::unbounded_channel();
        *self.page_events.lock() = Some(tx);

        let page = PageSession::new(session_id, self.wire.clone(), rx);
        page.enable_domains().await?;
        Ok(page)
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
