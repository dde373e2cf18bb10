//! Single long-lived channel to the backend.
//!
//! A manager owns at most one channel at a time. Every open/close transition is published
//! exactly once to the registered listeners and to the inbound event stream. After
//! [`ConnectionManager::close`] returns, nothing more is published for that channel.
//! There is no automatic reconnect.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use super::error::{ChannelError, Result};
use super::events::{InboundEvent, OutboundEvent, decode_inbound};
use super::protocol::{
    EnginePacket, SocketPacket, decode_engine, decode_socket, encode_engine, encode_message,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub connected: bool,
}

pub type StateListener = Arc<dyn Fn(ConnectionState) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub connect_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Builds the Socket.IO WebSocket URL for a backend base URL.
///
/// `http://localhost:3001` becomes `ws://localhost:3001/socket.io/?EIO=4&transport=websocket`.
pub fn socket_url(endpoint: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ChannelError::InvalidUrl(format!(
                "URL must use http(s):// or ws(s):// scheme, got: {other}"
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ChannelError::InvalidUrl(endpoint.to_string()))?;

    if !url.path().contains("socket.io") {
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}/socket.io/"));
    }
    url.query_pairs_mut()
        .append_pair("EIO", "4")
        .append_pair("transport", "websocket");
    Ok(url)
}

struct NotifierInner {
    generation: u64,
    listeners: Vec<StateListener>,
}

/// Publishes state transitions and inbound events for the current channel generation only.
///
/// Listeners run while the notifier lock is held; they must not register further listeners.
struct Notifier {
    inner: Mutex<NotifierInner>,
    connected: AtomicBool,
    events: mpsc::UnboundedSender<InboundEvent>,
}

impl Notifier {
    fn new(events: mpsc::UnboundedSender<InboundEvent>) -> Self {
        Self {
            inner: Mutex::new(NotifierInner {
                generation: 0,
                listeners: Vec::new(),
            }),
            connected: AtomicBool::new(false),
            events,
        }
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: StateListener) {
        self.inner.lock().listeners.push(listener);
    }

    fn begin(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.lock().generation == generation
    }

    fn transition(&self, generation: u64, connected: bool) -> bool {
        let inner = self.inner.lock();
        if inner.generation != generation || self.connected() == connected {
            return false;
        }
        self.connected.store(connected, Ordering::SeqCst);

        let state = ConnectionState { connected };
        for listener in &inner.listeners {
            listener(state);
        }
        let event = if connected {
            InboundEvent::Connected
        } else {
            InboundEvent::Disconnected
        };
        let _ = self.events.send(event);
        true
    }

    fn forward(&self, generation: u64, event: InboundEvent) -> bool {
        let inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        self.events.send(event).is_ok()
    }

    /// Publishes the final `connected=false` if needed and seals the generation.
    fn retire(&self, generation: u64) {
        self.transition(generation, false);
        let mut inner = self.inner.lock();
        if inner.generation == generation {
            inner.generation += 1;
        }
    }
}

struct ActiveChannel {
    generation: u64,
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

enum Phase {
    Idle,
    Connecting(u64),
    Open(ActiveChannel),
}

impl Phase {
    fn generation(&self) -> Option<u64> {
        match self {
            Phase::Idle => None,
            Phase::Connecting(generation) => Some(*generation),
            Phase::Open(active) => Some(active.generation),
        }
    }
}

/// Handle to an open channel, used to emit events.
#[derive(Clone)]
pub struct ChannelHandle {
    generation: u64,
    outbound: mpsc::UnboundedSender<Message>,
    notifier: Arc<Notifier>,
}

impl ChannelHandle {
    pub fn is_open(&self) -> bool {
        self.notifier.connected() && self.notifier.is_current(self.generation)
    }

    pub fn emit(&self, event: &OutboundEvent) -> Result<()> {
        if !self.is_open() {
            return Err(ChannelError::NotConnected);
        }
        let text = event.encode()?;
        self.outbound
            .send(Message::text(text))
            .map_err(|_| ChannelError::Closed)
    }
}

pub struct ConnectionManager {
    endpoint: String,
    url: Url,
    config: ChannelConfig,
    notifier: Arc<Notifier>,
    phase: Arc<Mutex<Phase>>,
}

impl ConnectionManager {
    /// Inbound events, including `Connected`/`Disconnected`, are delivered on `events`.
    pub fn new(endpoint: &str, events: mpsc::UnboundedSender<InboundEvent>) -> Result<Self> {
        Self::with_config(endpoint, ChannelConfig::default(), events)
    }

    pub fn with_config(
        endpoint: &str,
        config: ChannelConfig,
        events: mpsc::UnboundedSender<InboundEvent>,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            url: socket_url(endpoint)?,
            config,
            notifier: Arc::new(Notifier::new(events)),
            phase: Arc::new(Mutex::new(Phase::Idle)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn socket_url(&self) -> &str {
        self.url.as_str()
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState {
            connected: self.notifier.connected(),
        }
    }

    /// Registers a listener for open/close transitions.
    ///
    /// Listeners run synchronously on the transitioning task and must not call back into the
    /// manager.
    pub fn on_state_change<F>(&self, listener: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        self.notifier.subscribe(Arc::new(listener));
    }

    /// Opens the channel and waits until the backend acknowledges the namespace connect.
    ///
    /// Fails with [`ChannelError::AlreadyConnected`] while another channel is connecting or open.
    pub async fn connect(&self) -> Result<ChannelHandle> {
        let generation = {
            let mut phase = self.phase.lock();
            if !matches!(*phase, Phase::Idle) {
                return Err(ChannelError::AlreadyConnected);
            }
            let generation = self.notifier.begin();
            *phase = Phase::Connecting(generation);
            generation
        };

        log::info!("Connecting to {}", self.endpoint);
        match timeout(self.config.connect_timeout, self.establish(generation)).await {
            Ok(Ok(handle)) => {
                log::info!("Connected to {}", self.endpoint);
                Ok(handle)
            }
            Ok(Err(err)) => {
                self.abandon(generation);
                log::warn!("Connection to {} failed: {}", self.endpoint, err);
                Err(err)
            }
            Err(_) => {
                self.abandon(generation);
                log::warn!("Connection to {} timed out", self.endpoint);
                Err(ChannelError::Timeout(format!(
                    "connection timeout after {:?}",
                    self.config.connect_timeout
                )))
            }
        }
    }

    async fn establish(&self, generation: u64) -> Result<ChannelHandle> {
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|err| ChannelError::WebSocket(err.to_string()))?;
        let (writer, reader) = stream.split();

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        {
            let mut phase = self.phase.lock();
            if phase.generation() != Some(generation) {
                return Err(ChannelError::Closed);
            }
            // spawned under the lock so the reader cannot observe `Connecting`
            let writer_task = tokio::spawn(write_loop(writer, outbound_rx));
            let reader_task = tokio::spawn(
                ReadLoop {
                    endpoint: self.endpoint.clone(),
                    generation,
                    outbound: outbound_tx.clone(),
                    notifier: Arc::clone(&self.notifier),
                    phase: Arc::clone(&self.phase),
                    ready: Some(ready_tx),
                }
                .run(reader),
            );
            *phase = Phase::Open(ActiveChannel {
                generation,
                outbound: outbound_tx.clone(),
                reader: reader_task,
                writer: writer_task,
            });
        }

        ready_rx.await.map_err(|_| ChannelError::Closed)??;
        if !self.notifier.is_current(generation) {
            return Err(ChannelError::Closed);
        }
        Ok(ChannelHandle {
            generation,
            outbound: outbound_tx,
            notifier: Arc::clone(&self.notifier),
        })
    }

    fn abandon(&self, generation: u64) {
        let mut phase = self.phase.lock();
        if phase.generation() == Some(generation) {
            if let Phase::Open(active) = std::mem::replace(&mut *phase, Phase::Idle) {
                active.reader.abort();
                active.writer.abort();
            }
        }
        self.notifier.retire(generation);
    }

    /// Emits on the current channel. Fire-and-forget.
    pub fn emit(&self, event: &OutboundEvent) -> Result<()> {
        if !self.notifier.connected() {
            return Err(ChannelError::NotConnected);
        }
        let phase = self.phase.lock();
        let Phase::Open(active) = &*phase else {
            return Err(ChannelError::NotConnected);
        };
        let text = event.encode()?;
        active
            .outbound
            .send(Message::text(text))
            .map_err(|_| ChannelError::Closed)
    }

    /// Releases the channel. Returns `false` when there was nothing to close.
    ///
    /// Listeners see `connected=false` (if they had seen `true`) before this returns, and
    /// nothing afterwards.
    pub fn close(&self) -> bool {
        let mut phase = self.phase.lock();
        let generation = match std::mem::replace(&mut *phase, Phase::Idle) {
            Phase::Idle => return false,
            Phase::Connecting(generation) => generation,
            Phase::Open(active) => {
                active.reader.abort();
                // the writer exits after flushing the close frame
                let _ = active.outbound.send(Message::Close(None));
                active.generation
            }
        };
        self.notifier.retire(generation);
        drop(phase);
        log::info!("Closed channel to {}", self.endpoint);
        true
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

async fn write_loop(mut writer: WsWriter, mut outbound: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = outbound.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(err) = writer.send(message).await {
            log::debug!("websocket write failed: {}", err);
            break;
        }
        if closing {
            break;
        }
    }
}

struct ReadLoop {
    endpoint: String,
    generation: u64,
    outbound: mpsc::UnboundedSender<Message>,
    notifier: Arc<Notifier>,
    phase: Arc<Mutex<Phase>>,
    ready: Option<oneshot::Sender<Result<()>>>,
}

impl ReadLoop {
    async fn run(mut self, mut reader: WsReader) {
        while let Some(frame) = reader.next().await {
            let keep_going = match frame {
                Ok(Message::Text(text)) => self.handle_engine(text.as_str()),
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(err) => {
                    log::warn!("websocket read error on {}: {}", self.endpoint, err);
                    false
                }
            };
            if !keep_going {
                break;
            }
        }
        self.finish();
    }

    fn send(&self, text: String) {
        let _ = self.outbound.send(Message::text(text));
    }

    fn handle_engine(&mut self, text: &str) -> bool {
        match decode_engine(text) {
            Ok(EnginePacket::Open(handshake)) => {
                log::debug!("engine.io session {} opened", handshake.sid);
                match encode_message(SocketPacket::Connect(None)) {
                    Ok(frame) => self.send(frame),
                    Err(err) => log::warn!("failed to encode namespace connect: {}", err),
                }
                true
            }
            Ok(EnginePacket::Ping(data)) => {
                self.send(encode_engine(&EnginePacket::Pong(data)));
                true
            }
            Ok(EnginePacket::Close) => false,
            Ok(EnginePacket::Message(payload)) => self.handle_socket(&payload),
            Ok(EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop) => true,
            Err(err) => {
                log::warn!("protocol parse error on {}: {}", self.endpoint, err);
                true
            }
        }
    }

    fn handle_socket(&mut self, payload: &str) -> bool {
        let frame = match decode_socket(payload) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("dropping socket.io packet from {}: {}", self.endpoint, err);
                return true;
            }
        };
        if !frame.is_default_namespace() {
            log::debug!("ignoring packet for namespace {}", frame.namespace);
            return true;
        }

        match frame.packet {
            SocketPacket::Connect(_) => {
                let _phase = self.phase.lock();
                self.notifier.transition(self.generation, true);
                if let Some(ready) = self.ready.take() {
                    let _ = ready.send(Ok(()));
                }
                true
            }
            SocketPacket::Disconnect => {
                log::info!("{} closed the channel", self.endpoint);
                false
            }
            SocketPacket::ConnectError(reason) => {
                if let Some(ready) = self.ready.take() {
                    let _ = ready.send(Err(ChannelError::Rejected(reason.to_string())));
                }
                false
            }
            SocketPacket::Event { name, args, .. } => {
                match decode_inbound(&name, args) {
                    Ok(Some(event)) => {
                        self.notifier.forward(self.generation, event);
                    }
                    Ok(None) => log::debug!("ignoring unknown event {}", name),
                    Err(err) => log::warn!("dropping malformed {} event: {}", name, err),
                }
                true
            }
            SocketPacket::Ack { .. } => true,
        }
    }

    fn finish(self) {
        let mut phase = self.phase.lock();
        self.notifier.retire(self.generation);
        let ours = matches!(&*phase, Phase::Open(active) if active.generation == self.generation);
        if ours {
            if let Phase::Open(active) = std::mem::replace(&mut *phase, Phase::Idle) {
                active.writer.abort();
            }
        }
        drop(phase);
        log::info!("Disconnected from {}", self.endpoint);
    }
}
