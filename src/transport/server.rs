//! WebSocket server the host process connects to.
//!
//! # Connection Flow
//!
//! 1. Bind to `localhost:0` (random port)
//! 2. Hand [`PendingServer::ws_url`] to the host process
//! 3. The host connects; the socket is upgraded to WebSocket
//! 4. The picker's outbox is attached and events start flowing

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::protocol::HostMessage;

use super::HostConnection;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for waiting for the host to connect.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PendingServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use webclip_picker::transport::PendingServer;
///
/// let (picker, outbox) = Picker::channel(document, overlay, options);
/// let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
///
/// // Hand ws_url to the host...
///
/// let connection = server.accept(outbox).await?;
/// ```
pub struct PendingServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Port the server is bound to.
    port: u16,
}

impl PendingServer {
    /// Binds a WebSocket server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let addr = SocketAddr::new(ip, port);
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        debug!(port = actual_port, "WebSocket server bound");

        Ok(Self {
            listener,
            port: actual_port,
        })
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL for this server.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the host's connection and attaches the picker's outbox.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the host doesn't connect within 30s
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    pub async fn accept(self, outbox: mpsc::UnboundedReceiver<HostMessage>) -> Result<HostConnection> {
        let accept_result = timeout(CONNECTION_TIMEOUT, self.listener.accept()).await;

        let (stream, addr) = accept_result
            .map_err(|_| Error::connection_timeout(CONNECTION_TIMEOUT.as_millis() as u64))??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Host connected");

        Ok(HostConnection::new(ws_stream, outbox))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

    use crate::geometry::Point;
    use crate::picker::fixture::{Page, page};
    use crate::picker::{InputEvent, Key, KeyEvent, PickerOptions, PointerEvent};
    use crate::protocol::{HoverRect, PageEvent, SelectionRequest};

    #[tokio::test]
    async fn test_server_bind_random_port() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");

        assert!(server.port() > 0);
        assert_eq!(server.ws_url(), format!("ws://127.0.0.1:{}", server.port()));
    }

    #[tokio::test]
    async fn test_messages_flow_both_ways() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");
        let url = server.ws_url();

        let host = tokio::spawn(async move { tokio_tungstenite::connect_async(url).await });
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let connection = server.accept(outbox_rx).await.expect("accept");
        let (mut host_ws, _) = host.await.expect("join").expect("connect");

        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        connection.set_event_sink(sink_tx);

        // host -> page
        host_ws
            .send(Message::Text(r#"{"event":"enablePicker"}"#.into()))
            .await
            .expect("host send");
        assert_eq!(
            sink_rx.recv().await.expect("event"),
            PageEvent::EnablePicker { enable: true }
        );

        // page -> host
        let request = HostMessage::TakeScreenshot(SelectionRequest {
            hover_info: HoverRect {
                left: 1.0,
                top: 2.0,
                width: 3.0,
                height: 4.0,
            },
            continue_picking: false,
        });
        outbox_tx.send(request.clone()).expect("queue");

        let frame = loop {
            match host_ws.next().await.expect("frame").expect("ws") {
                Message::Text(text) => break text,
                _ => continue,
            }
        };
        let received: HostMessage = serde_json::from_str(&frame).expect("parse");
        assert_eq!(received, request);

        connection.shutdown();
    }

    #[tokio::test]
    async fn test_malformed_capture_reported_to_host() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");
        let url = server.ws_url();

        let Page {
            mut picker,
            outbox,
            div,
            ..
        } = page(PickerOptions::new().with_capture_delay(Duration::ZERO));

        let host = tokio::spawn(async move { tokio_tungstenite::connect_async(url).await });
        let connection = server.accept(outbox).await.expect("accept");
        let (mut host_ws, _) = host.await.expect("join").expect("connect");

        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        connection.set_event_sink(sink_tx);

        // a confirmed selection is waiting for its capture
        picker.enable();
        picker.dispatch(&InputEvent::PointerMove(PointerEvent::at(Point::new(30.0, 30.0))));
        picker.dispatch(&InputEvent::KeyDown(KeyEvent::new(Key::Space).with_shift(true)));
        assert_eq!(recv_host_message(&mut host_ws).await.event_name(), "takeScreenshot");

        host_ws
            .send(Message::Text(
                r#"{"event":"takenScreenshot","data":{"dataURL":5,"continuePicking":true}}"#.into(),
            ))
            .await
            .expect("host send");
        let event = sink_rx.recv().await.expect("event");
        assert!(matches!(event, PageEvent::MalformedCapture { .. }));
        picker.handle_page_event(event);

        match recv_host_message(&mut host_ws).await {
            HostMessage::CaptureFailed {
                continue_picking, ..
            } => assert!(continue_picking),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(picker.is_enabled());
        assert_eq!(picker.session().last_confirmed_element(), Some(div));

        connection.shutdown();
    }

    #[tokio::test]
    async fn test_unparseable_frame_is_dropped() {
        let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");
        let url = server.ws_url();

        let host = tokio::spawn(async move { tokio_tungstenite::connect_async(url).await });
        let (_outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let connection = server.accept(outbox_rx).await.expect("accept");
        let (mut host_ws, _) = host.await.expect("join").expect("connect");

        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        connection.set_event_sink(sink_tx);

        let garbage = format!("data:image/png;base64,{}", "A".repeat(64 * 1024));
        host_ws
            .send(Message::Text(garbage.into()))
            .await
            .expect("host send");
        host_ws
            .send(Message::Text(r#"{"event":"enablePicker","data":{"enable":false}}"#.into()))
            .await
            .expect("host send");

        assert_eq!(
            sink_rx.recv().await.expect("event"),
            PageEvent::EnablePicker { enable: false }
        );
        assert!(!connection.is_closed());

        connection.shutdown();
    }

    async fn recv_host_message(host_ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>) -> HostMessage {
        loop {
            match host_ws.next().await.expect("frame").expect("ws") {
                Message::Text(text) => return serde_json::from_str(&text).expect("parse"),
                _ => continue,
            }
        }
    }
}
