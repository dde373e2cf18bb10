//! Socket.IO v4 framing over Engine.IO v4 (WebSocket transport, text frames only).
//!
//! An Engine.IO frame is one type digit followed by its payload. Socket.IO packets travel
//! inside Engine.IO `message` frames: `<type>[/<namespace>,][<ack id>][<json>]`.

use serde::Deserialize;
use serde_json::Value;

use super::error::{ChannelError, Result};

pub const DEFAULT_NAMESPACE: &str = "/";

/// Engine.IO handshake sent by the server right after the WebSocket opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

pub fn decode_engine(text: &str) -> Result<EnginePacket> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ChannelError::Protocol("empty engine.io frame".to_string()))?;
    let body = chars.as_str();
    let packet = match kind {
        '0' => EnginePacket::Open(serde_json::from_str(body)?),
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping(body.to_string()),
        '3' => EnginePacket::Pong(body.to_string()),
        '4' => EnginePacket::Message(body.to_string()),
        '5' => EnginePacket::Upgrade,
        '6' => EnginePacket::Noop,
        other => {
            return Err(ChannelError::Protocol(format!(
                "unknown engine.io packet type {other:?}"
            )));
        }
    };
    Ok(packet)
}

pub fn encode_engine(packet: &EnginePacket) -> String {
    match packet {
        EnginePacket::Open(handshake) => {
            format!("0{{\"sid\":{}}}", Value::from(handshake.sid.as_str()))
        }
        EnginePacket::Close => "1".to_string(),
        EnginePacket::Ping(data) => format!("2{data}"),
        EnginePacket::Pong(data) => format!("3{data}"),
        EnginePacket::Message(data) => format!("4{data}"),
        EnginePacket::Upgrade => "5".to_string(),
        EnginePacket::Noop => "6".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event {
        name: String,
        args: Vec<Value>,
        ack: Option<u64>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(Value),
}

/// A Socket.IO packet together with the namespace it addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketFrame {
    pub namespace: String,
    pub packet: SocketPacket,
}

impl SocketFrame {
    pub fn new(packet: SocketPacket) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            packet,
        }
    }

    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }
}

fn split_namespace(rest: &str) -> (&str, &str) {
    if !rest.starts_with('/') {
        return (DEFAULT_NAMESPACE, rest);
    }
    match rest.find(',') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    }
}

fn split_ack(rest: &str) -> Result<(Option<u64>, &str)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Ok((None, rest));
    }
    let id = rest[..digits]
        .parse()
        .map_err(|_| ChannelError::Protocol(format!("invalid ack id in {rest:?}")))?;
    Ok((Some(id), &rest[digits..]))
}

fn parse_array(data: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(data)? {
        Value::Array(items) => Ok(items),
        other => Err(ChannelError::Protocol(format!(
            "expected JSON array, got {other}"
        ))),
    }
}

/// Decodes the payload of an Engine.IO `message` frame.
pub fn decode_socket(text: &str) -> Result<SocketFrame> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ChannelError::Protocol("empty socket.io packet".to_string()))?;
    let (namespace, rest) = split_namespace(chars.as_str());
    let (ack, data) = split_ack(rest)?;

    let packet = match kind {
        '0' => SocketPacket::Connect(if data.is_empty() {
            None
        } else {
            Some(serde_json::from_str(data)?)
        }),
        '1' => SocketPacket::Disconnect,
        '2' => {
            let mut args = parse_array(data)?;
            if args.is_empty() {
                return Err(ChannelError::Protocol("event without a name".to_string()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(ChannelError::Protocol(format!(
                        "event name must be a string, got {other}"
                    )));
                }
            };
            SocketPacket::Event { name, args, ack }
        }
        '3' => SocketPacket::Ack {
            id: ack.ok_or_else(|| ChannelError::Protocol("ack without id".to_string()))?,
            args: parse_array(data)?,
        },
        '4' => SocketPacket::ConnectError(if data.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(data)?
        }),
        '5' | '6' => {
            return Err(ChannelError::Protocol(
                "binary socket.io packets are not supported".to_string(),
            ));
        }
        other => {
            return Err(ChannelError::Protocol(format!(
                "unknown socket.io packet type {other:?}"
            )));
        }
    };

    Ok(SocketFrame {
        namespace: namespace.to_string(),
        packet,
    })
}

/// Encodes a Socket.IO packet (without the Engine.IO `4` prefix).
pub fn encode_socket(frame: &SocketFrame) -> Result<String> {
    let mut out = String::new();
    let (kind, ack, data) = match &frame.packet {
        SocketPacket::Connect(auth) => ('0', None, auth.as_ref().map(Value::to_string)),
        SocketPacket::Disconnect => ('1', None, None),
        SocketPacket::Event { name, args, ack } => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Value::String(name.clone()));
            items.extend(args.iter().cloned());
            ('2', *ack, Some(serde_json::to_string(&items)?))
        }
        SocketPacket::Ack { id, args } => ('3', Some(*id), Some(serde_json::to_string(args)?)),
        SocketPacket::ConnectError(value) => ('4', None, Some(value.to_string())),
    };

    out.push(kind);
    if !frame.is_default_namespace() {
        out.push_str(&frame.namespace);
        out.push(',');
    }
    if let Some(ack) = ack {
        out.push_str(&ack.to_string());
    }
    if let Some(data) = data {
        out.push_str(&data);
    }
    Ok(out)
}

/// Full text frame for a Socket.IO packet on the default namespace.
pub fn encode_message(packet: SocketPacket) -> Result<String> {
    let socket = encode_socket(&SocketFrame::new(packet))?;
    Ok(encode_engine(&EnginePacket::Message(socket)))
}
