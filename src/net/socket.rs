/// WebSocket transport on a background thread.
///
/// The thread owns the socket and only moves text frames between it and
/// two channels. Reads use a short socket timeout so queued requests go
/// out promptly even when the server is quiet.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::domain::command::Request;
use crate::domain::wire;
use crate::error::{ClientError, Result};
use crate::net::{NetEvent, Transport};

const READ_POLL: Duration = Duration::from_millis(20);

pub struct WebSocketTransport {
    outbound: Sender<String>,
    inbound: Receiver<NetEvent>,
    connected: bool,
}

impl WebSocketTransport {
    /// Start connecting to `url` in the background.
    pub fn spawn(url: &str) -> Result<Self> {
        let (out_tx, out_rx) = mpsc::channel();
        let (in_tx, in_rx) = mpsc::channel();
        let url = url.to_string();

        thread::Builder::new()
            .name("websocket".into())
            .spawn(move || {
                let reason = match run(&url, &out_rx, &in_tx) {
                    Ok(()) => "connection closed".to_string(),
                    Err(e) => {
                        error!(error = %e, url = %url, "websocket failed");
                        e.to_string()
                    }
                };
                // The UI may already be gone.
                let _ = in_tx.send(NetEvent::Disconnected(reason));
            })?;

        Ok(WebSocketTransport { outbound: out_tx, inbound: in_rx, connected: false })
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Transport for WebSocketTransport {
    fn send(&mut self, request: &Request) -> Result<()> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        let text = request.to_json()?;
        self.outbound.send(text).map_err(|_| ClientError::ChannelClosed)
    }

    fn poll(&mut self) -> Vec<NetEvent> {
        let mut events = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(event) => {
                    match &event {
                        NetEvent::Connected => self.connected = true,
                        NetEvent::Disconnected(_) => self.connected = false,
                        NetEvent::Snapshot(_) => {}
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected = false;
                    break;
                }
            }
        }
        events
    }
}

// ── Worker thread ──

fn run(url: &str, outbound: &Receiver<String>, inbound: &Sender<NetEvent>) -> Result<()> {
    let (mut socket, response) = tungstenite::connect(url)?;
    info!(url, status = %response.status(), "connected");
    if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
        stream.set_read_timeout(Some(READ_POLL))?;
    }
    inbound.send(NetEvent::Connected).map_err(|_| ClientError::ChannelClosed)?;
    socket.send(Message::Text(Request::GetGameState.to_json()?))?;

    loop {
        if !flush_outbound(&mut socket, outbound)? {
            debug!("client shutting down, closing socket");
            let _ = socket.close(None);
            return Ok(());
        }
        match socket.read() {
            Ok(Message::Text(text)) => match wire::decode(&text) {
                Ok(snapshot) => {
                    inbound.send(NetEvent::Snapshot(snapshot)).map_err(|_| ClientError::ChannelClosed)?;
                }
                Err(e) => warn!(error = %e, len = text.len(), "dropping undecodable frame"),
            },
            Ok(Message::Close(frame)) => {
                info!(?frame, "server closed the connection");
                return Ok(());
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e)) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return Err(e.into()),
        }
    }
}

/// Send everything queued. Returns false once the UI side has hung up.
fn flush_outbound(socket: &mut WebSocket<MaybeTlsStream<TcpStream>>, outbound: &Receiver<String>) -> Result<bool> {
    loop {
        match outbound.try_recv() {
            Ok(text) => {
                debug!(len = text.len(), "sending");
                socket.send(Message::Text(text))?;
            }
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        }
    }
}
