/// Error types for the transport and wire layers.
///
/// Rendering and navigation never fail; only talking to the server does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    Connect(#[from] tungstenite::Error),

    #[error("could not decode server message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport is not connected yet")]
    NotConnected,

    #[error("transport channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, ClientError>;
