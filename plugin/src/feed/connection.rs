//! Feed Connection
//!
//! An explicitly owned WebSocket connection to a feed endpoint, backed by
//! tokio-tungstenite. The connection runs on its own thread with a private
//! tokio runtime, reconnects with exponential backoff, and hands frames and
//! state changes to the owner over a bounded channel in arrival order.

use std::fmt;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{WebSocketStream, client_async};
use url::Url;

use crate::feed::backoff::ReconnectPolicy;
use crate::feed::config::FeedConfig;
use crate::feed::error::{FeedError, Result};

/// Lifecycle of a feed connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    /// Not connected and not trying to. Initial and terminal state.
    #[default]
    Disconnected,
    /// Dialing the endpoint. `attempt` is one more than the retries made
    /// since the last successful connect.
    Connecting { attempt: u32 },
    Connected,
    /// Waiting `delay` before retry number `attempt`.
    Reconnecting { attempt: u32, delay: Duration },
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting { attempt } => {
                write!(f, "connecting (attempt {})", attempt)
            }
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Reconnecting { attempt, delay } => write!(
                f,
                "retrying in {:.1}s (attempt {})",
                delay.as_secs_f64(),
                attempt
            ),
        }
    }
}

/// Events delivered to the owner of a connection, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    State(ConnectionState),
    /// One text frame, undecoded.
    Frame(String),
}

/// Receiving half of a connection's event channel.
pub struct FeedEventReceiver {
    rx: Mutex<mpsc::Receiver<FeedEvent>>,
}

impl FeedEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<FeedEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }
}

pub(crate) fn event_channel(capacity: usize) -> (mpsc::Sender<FeedEvent>, FeedEventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, FeedEventReceiver { rx: Mutex::new(rx) })
}

/// An open feed connection.
///
/// Dropping it stops the connection thread and waits for it to exit.
pub struct FeedConnection {
    endpoint: Url,
    shutdown: watch::Sender<bool>,
    state: watch::Receiver<ConnectionState>,
    handle: Option<JoinHandle<()>>,
}

impl FeedConnection {
    /// Validate `config` and start connecting in the background.
    pub fn open(config: &FeedConfig) -> Result<(FeedConnection, FeedEventReceiver)> {
        let endpoint = config.endpoint_url()?;
        let origin = config.origin_header()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .thread_name("live-feed-io")
            .build()
            .map_err(FeedError::Runtime)?;

        let (events_tx, events_rx) = event_channel(config.channel_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let worker = Worker {
            endpoint: endpoint.clone(),
            origin,
            policy: config.reconnect.clone(),
            connect_timeout: config.connect_timeout,
            events: events_tx,
            state: state_tx,
            shutdown: shutdown_rx,
        };

        let handle = thread::Builder::new()
            .name("live-feed".to_string())
            .spawn(move || runtime.block_on(worker.run()))
            .map_err(FeedError::Runtime)?;

        log::info!("[LiveFeed] Opened connection to {}", endpoint);

        Ok((
            FeedConnection {
                endpoint,
                shutdown: shutdown_tx,
                state: state_rx,
                handle: Some(handle),
            },
            events_rx,
        ))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The most recently published state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Ask the connection thread to close the socket and stop. Does not block.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[LiveFeed] Connection thread panicked");
            }
        }
        log::info!("[LiveFeed] Connection to {} released", self.endpoint);
    }
}

/// How a connected session ended.
enum SessionEnd {
    Shutdown,
    Lost,
}

/// State owned by the connection thread.
struct Worker {
    endpoint: Url,
    origin: Option<HeaderValue>,
    policy: ReconnectPolicy,
    connect_timeout: Duration,
    events: mpsc::Sender<FeedEvent>,
    state: watch::Sender<ConnectionState>,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    async fn run(self) {
        let mut retry = 0;

        loop {
            if !self.publish(ConnectionState::Connecting { attempt: retry + 1 }).await {
                break;
            }

            let connected = tokio::select! {
                result = self.connect() => result,
                _ = wait_for_shutdown(self.shutdown.clone()) => break,
            };

            match connected {
                Ok(stream) => {
                    retry = 0;
                    if !self.publish(ConnectionState::Connected).await {
                        break;
                    }
                    if let SessionEnd::Shutdown = self.session(stream).await {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("[LiveFeed] Connecting to {} failed: {}", self.endpoint, e);
                }
            }

            retry += 1;
            if !self.policy.allows(retry) {
                log::error!(
                    "[LiveFeed] Giving up on {} after {} retries",
                    self.endpoint,
                    retry - 1
                );
                break;
            }

            let delay = self.policy.delay_for(retry);
            if !self.publish(ConnectionState::Reconnecting { attempt: retry, delay }).await {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_for_shutdown(self.shutdown.clone()) => break,
            }
        }

        self.publish(ConnectionState::Disconnected).await;
        log::info!("[LiveFeed] Connection to {} ended", self.endpoint);
    }

    /// TCP connect plus WebSocket handshake, bounded by the connect timeout.
    async fn connect(&self) -> Result<WebSocketStream<TcpStream>> {
        tokio::time::timeout(self.connect_timeout, self.handshake())
            .await
            .map_err(|_| FeedError::Timeout(self.connect_timeout))?
    }

    async fn handshake(&self) -> Result<WebSocketStream<TcpStream>> {
        let host = self.endpoint.host_str().unwrap_or("localhost");
        let port = self.endpoint.port_or_known_default().unwrap_or(80);
        let addr = format!("{}:{}", host, port);

        log::debug!("[LiveFeed] Connecting TCP to {}", addr);
        let tcp_stream = TcpStream::connect(&addr).await.map_err(FeedError::Connect)?;

        let mut request = self.endpoint.as_str().into_client_request()?;
        if let Some(origin) = &self.origin {
            request.headers_mut().insert("Origin", origin.clone());
        }

        let (stream, response) = client_async(request, tcp_stream).await?;
        log::debug!("[LiveFeed] Handshake complete (status: {})", response.status());

        Ok(stream)
    }

    /// Forward text frames until the socket ends or shutdown is requested.
    async fn session(&self, stream: WebSocketStream<TcpStream>) -> SessionEnd {
        let (mut write, mut read) = stream.split();

        loop {
            let next = tokio::select! {
                next = read.next() => next,
                _ = wait_for_shutdown(self.shutdown.clone()) => None,
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    log::error!("[LiveFeed] Read error: {}", e);
                    return SessionEnd::Lost;
                }
                None if self.shutdown_requested() => {
                    log::info!("[LiveFeed] Closing connection to {}", self.endpoint);
                    self.send_close(&mut write).await;
                    return SessionEnd::Shutdown;
                }
                None => {
                    log::warn!("[LiveFeed] Connection to {} dropped", self.endpoint);
                    return SessionEnd::Lost;
                }
            };

            match message {
                Message::Text(text) => {
                    let text = text.as_str();
                    log::debug!(
                        "[LiveFeed] Received: {}",
                        text.chars().take(100).collect::<String>()
                    );
                    if !self.forward(FeedEvent::Frame(text.to_owned())).await {
                        self.send_close(&mut write).await;
                        return SessionEnd::Shutdown;
                    }
                }
                Message::Binary(data) => {
                    log::debug!("[LiveFeed] Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Close(frame) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((1005, String::new()));
                    log::warn!("[LiveFeed] Server closed connection: {} {}", code, reason);
                    return SessionEnd::Lost;
                }
                // Pongs are queued by tungstenite.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    /// Best-effort close frame. A peer that stops reading must not hold up
    /// shutdown, so the send is bounded by the connect timeout.
    async fn send_close<S>(&self, write: &mut S)
    where
        S: Sink<Message> + Unpin,
    {
        match tokio::time::timeout(self.connect_timeout, write.send(Message::Close(None))).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => log::debug!("[LiveFeed] Close frame to {} not sent", self.endpoint),
            Err(_) => log::warn!(
                "[LiveFeed] Timed out sending close frame to {}",
                self.endpoint
            ),
        }
    }

    /// Record and deliver a state change. False once nobody is listening.
    async fn publish(&self, state: ConnectionState) -> bool {
        log::info!("[LiveFeed] {}: {}", self.endpoint, state);
        self.state.send_replace(state.clone());
        self.forward(FeedEvent::State(state)).await
    }

    /// Deliver an event, waiting for channel capacity. False if the receiver
    /// is gone or shutdown was requested while the channel was full.
    async fn forward(&self, event: FeedEvent) -> bool {
        tokio::select! {
            biased;
            result = self.events.send(event) => result.is_ok(),
            _ = wait_for_shutdown(self.shutdown.clone()) => false,
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Resolves once shutdown is requested or the owning handle is gone.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
