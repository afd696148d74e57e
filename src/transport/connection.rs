//! WebSocket connection and event loop.
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming text frames from the host, parsed as [`PageEvent`]s and
//!   forwarded to the event sink
//! - Outgoing [`HostMessage`]s from the picker's outbox
//! - Shutdown requests

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::to_string;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{HostMessage, PageEvent};

// ============================================================================
// Types
// ============================================================================

/// Destination for events received from the host.
pub type EventSink = mpsc::UnboundedSender<PageEvent>;

type WsWriter = SplitSink<WebSocketStream<TcpStream>, Message>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a message to the host.
    Send(HostMessage),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// HostConnection
// ============================================================================

/// WebSocket connection to the host process.
///
/// Cheap to clone; all clones share the same socket and event sink.
#[derive(Clone)]
pub struct HostConnection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Event sink (shared with event loop).
    event_sink: Arc<Mutex<Option<EventSink>>>,
}

impl HostConnection {
    /// Creates a connection from a WebSocket stream.
    ///
    /// Messages queued on `outbox` are written to the socket until the
    /// outbox or the socket closes. Spawns the event loop task internally.
    pub(crate) fn new(
        ws_stream: WebSocketStream<TcpStream>,
        outbox: mpsc::UnboundedReceiver<HostMessage>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let event_sink: Arc<Mutex<Option<EventSink>>> = Arc::new(Mutex::new(None));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            outbox,
            Arc::clone(&event_sink),
        ));

        Self {
            command_tx,
            event_sink,
        }
    }

    /// Sets where incoming events go, replacing any previous sink.
    pub fn set_event_sink(&self, sink: EventSink) {
        *self.event_sink.lock() = Some(sink);
    }

    /// Clears the event sink. Incoming events are dropped until a new one is set.
    pub fn clear_event_sink(&self) {
        *self.event_sink.lock() = None;
    }

    /// Sends a message to the host outside the picker's outbox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has stopped.
    pub fn send(&self, message: HostMessage) -> Result<()> {
        self.command_tx
            .send(ConnectionCommand::Send(message))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Returns `true` once the event loop has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Closes the socket and stops the event loop.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WebSocketStream<TcpStream>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        mut outbox: mpsc::UnboundedReceiver<HostMessage>,
        event_sink: Arc<Mutex<Option<EventSink>>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();
        let mut outbox_open = true;

        loop {
            tokio::select! {
                // Incoming messages from the host
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &event_sink);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by host");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Messages from the picker
                message = outbox.recv(), if outbox_open => {
                    match message {
                        Some(message) => Self::write_message(&mut ws_write, &message).await,
                        None => {
                            debug!("Picker outbox closed");
                            outbox_open = false;
                        }
                    }
                }

                // Commands from the Rust API
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(message)) => {
                            Self::write_message(&mut ws_write, &message).await;
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        debug!("Host connection event loop terminated");
    }

    /// Parses a text frame and hands it to the event sink.
    fn handle_incoming_message(text: &str, event_sink: &Arc<Mutex<Option<EventSink>>>) {
        let event = match PageEvent::from_json(text) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, len = text.len(), "Failed to parse host message");
                return;
            }
        };

        let sink = event_sink.lock();
        match sink.as_ref() {
            Some(sink) => {
                if sink.send(event).is_err() {
                    warn!("Event sink closed, dropping host event");
                }
            }
            None => debug!(event = event.event_name(), "No event sink, dropping host event"),
        }
    }

    /// Serializes and writes one message.
    async fn write_message(ws_write: &mut WsWriter, message: &HostMessage) {
        let json = match to_string(message) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize host message");
                return;
            }
        };

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            warn!(error = %e, event = message.event_name(), "Failed to send host message");
            return;
        }

        trace!(event = message.event_name(), "Host message sent");
    }
}
