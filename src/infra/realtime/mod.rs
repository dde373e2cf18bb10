//! Realtime channel to the DebugFlow backend (Socket.IO over WebSocket).

pub mod connection;
pub mod error;
pub mod events;
pub mod protocol;

pub use connection::{
    ChannelConfig, ChannelHandle, ConnectionManager, ConnectionState, StateListener, socket_url,
};
pub use error::{ChannelError, Result};
pub use events::{DebugResponse, InboundEvent, OutboundEvent, ProjectUpdate, decode_inbound};
