//! TCP command transport to the Unreal Editor plugin.
//!
//! One request/response pair per TCP connection: every command pays the
//! full connect/send/receive/close cycle. The editor survives crashes and
//! restarts between commands, and the bridge never has to reason about a
//! stale half-open socket.
//!
//! Wire format: a single UTF-8 JSON object in each direction, no length
//! prefix, no delimiter. A response is complete when the accumulated bytes
//! parse as one JSON document.

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream, lookup_host};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::error::TransportError;
use super::{policy, response};
use crate::config::Config;

/// Send/receive buffer size requested on every socket. Large responses
/// (blueprint graph dumps, asset listings) fragment less this way.
const SOCKET_BUFFER_BYTES: u32 = 131_072;

/// Socket state for one command cycle.
///
/// Invariant: `connected == true` implies `socket` holds a live handle;
/// the two are always updated together. All methods take `&mut self` and
/// do no locking of their own — exclusivity is the caller's problem,
/// enforced by the bridge's cycle lock.
struct Connection {
    socket: Option<TcpStream>,
    connected: bool,
    last_error: Option<String>,
}

impl Connection {
    fn new() -> Self {
        Self {
            socket: None,
            connected: false,
            last_error: None,
        }
    }

    /// One connection attempt: discard any previous socket, build a fresh
    /// one with the editor-facing options, connect within the timeout.
    async fn open(&mut self, config: &Config) -> Result<(), TransportError> {
        self.close().await;

        let target = format!("{}:{}", config.engine.host, config.engine.port);
        let addr = lookup_host(&target)
            .await?
            .next()
            .ok_or_else(|| TransportError::Io(std::io::Error::other(format!(
                "no address resolved for {target}"
            ))))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        // Command payloads are small and latency-sensitive
        socket.set_nodelay(true)?;
        socket.set_keepalive(true)?;
        socket.set_send_buffer_size(SOCKET_BUFFER_BYTES)?;
        socket.set_recv_buffer_size(SOCKET_BUFFER_BYTES)?;
        // Zero linger: close resets immediately instead of waiting on a
        // stuck editor. Not supported everywhere, so best effort.
        if let Err(e) = socket.set_linger(Some(Duration::ZERO)) {
            debug!("Could not set zero linger: {}", e);
        }

        let connect_timeout = config.transport.connect_timeout();
        match timeout(connect_timeout, socket.connect(addr)).await {
            Ok(Ok(stream)) => {
                self.socket = Some(stream);
                self.connected = true;
                self.last_error = None;
                Ok(())
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                Err(TransportError::Refused(e.to_string()))
            }
            Ok(Err(e)) => Err(TransportError::Io(e)),
            Err(_) => Err(TransportError::Timeout(format!(
                "connect to {} timed out after {}s",
                addr,
                connect_timeout.as_secs()
            ))),
        }
    }

    /// Connect with retry on already-exclusive state. Called from inside a
    /// command cycle, so the backoff sleeps happen while the cycle lock is
    /// held and queued commands wait their turn.
    async fn establish(&mut self, config: &Config) -> Result<(), TransportError> {
        let attempts = config.transport.max_retries + 1;
        for attempt in 0..attempts {
            info!(
                "Connecting to Unreal at {}:{} (attempt {}/{})...",
                config.engine.host,
                config.engine.port,
                attempt + 1,
                attempts
            );
            match self.open(config).await {
                Ok(()) => {
                    info!("Connected to Unreal Engine");
                    return Ok(());
                }
                Err(err) => {
                    warn!("Connection attempt {} failed: {}", attempt + 1, err);
                    self.last_error = Some(err.to_string());
                    self.close().await;
                    if attempt + 1 < attempts {
                        let delay = policy::retry_delay(
                            attempt,
                            config.transport.base_retry_delay(),
                            config.transport.max_retry_delay(),
                        );
                        debug!("Retrying connection in {:?}", delay);
                        sleep(delay).await;
                    }
                }
            }
        }

        let detail = self
            .last_error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        error!(
            "Failed to connect after {} attempts. Last error: {}",
            attempts, detail
        );
        Err(TransportError::ConnectFailed(format!(
            "{} attempts: {}",
            attempts, detail
        )))
    }

    /// Tear down the socket. Safe to call at any time, in any state.
    async fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            // Peer may already be gone; zero linger makes the drop abortive
            let _ = socket.shutdown().await;
        }
        self.connected = false;
    }

    async fn send_payload(
        &mut self,
        payload: &[u8],
        send_timeout: Duration,
    ) -> Result<(), TransportError> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| TransportError::Closed("not connected".to_string()))?;

        match timeout(send_timeout, socket.write_all(payload)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransportError::Io(e)),
            Err(_) => Err(TransportError::Timeout(format!(
                "send timed out after {}s",
                send_timeout.as_secs()
            ))),
        }
    }

    /// Read one complete JSON document.
    ///
    /// Completeness is defined as "the accumulated buffer parses as JSON" —
    /// that is the entire framing mechanism. Each read is bounded by the
    /// command's receive timeout, and the same timeout caps overall elapsed
    /// time so a peer trickling bytes cannot hold the cycle open forever.
    async fn receive_response(
        &mut self,
        recv_timeout: Duration,
        buffer_size: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| TransportError::Closed("not connected".to_string()))?;

        let mut data: Vec<u8> = Vec::new();
        let mut chunk = vec![0u8; buffer_size];
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            if elapsed > recv_timeout {
                if parses_as_json(&data) {
                    warn!(
                        "Using response received before overall timeout ({} bytes)",
                        data.len()
                    );
                    return Ok(data);
                }
                return Err(TransportError::Timeout(format!(
                    "overall timeout after {:.1}s ({} bytes received)",
                    elapsed.as_secs_f64(),
                    data.len()
                )));
            }

            match timeout(recv_timeout, socket.read(&mut chunk)).await {
                Err(_) => {
                    // The peer may have gone idle after a complete message
                    if parses_as_json(&data) {
                        info!(
                            "Got complete response after recv timeout ({} bytes)",
                            data.len()
                        );
                        return Ok(data);
                    }
                    return Err(TransportError::Timeout(format!(
                        "timeout after {:.1}s waiting for response ({} bytes received)",
                        start.elapsed().as_secs_f64(),
                        data.len()
                    )));
                }
                Ok(Ok(0)) => {
                    if data.is_empty() {
                        return Err(TransportError::Closed(
                            "connection closed before receiving any data".to_string(),
                        ));
                    }
                    if parses_as_json(&data) {
                        return Ok(data);
                    }
                    return Err(TransportError::Closed(format!(
                        "connection closed with incomplete data ({} bytes)",
                        data.len()
                    )));
                }
                Ok(Ok(n)) => {
                    data.extend_from_slice(&chunk[..n]);
                    if parses_as_json(&data) {
                        debug!("Received complete response ({} bytes)", data.len());
                        return Ok(data);
                    }
                    // Incomplete JSON or split UTF-8: keep reading
                }
                Ok(Err(e)) => return Err(TransportError::Io(e)),
            }
        }
    }
}

/// Whole-buffer completeness check. Re-parsing from scratch on every chunk
/// is O(n^2) on large responses but is what the editor-side protocol was
/// built against; swap in an incremental parser only with profiling data.
fn parses_as_json(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(text) => serde_json::from_str::<Value>(text).is_ok(),
        Err(_) => false,
    }
}

/// Client for the Unreal Editor command socket.
///
/// Clone-free: share it behind an `Arc`. Concurrent callers are serialized;
/// at most one connect/send/receive/close cycle runs at a time.
pub struct EngineBridge {
    config: Config,
    state: Mutex<Connection>,
}

impl EngineBridge {
    /// Construction never fails and never connects eagerly; the first
    /// command (or an explicit `connect`) establishes the socket.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            state: Mutex::new(Connection::new()),
        }
    }

    /// Probe connectivity with retry. The lock is held only for each
    /// attempt, never across the backoff sleeps, so callers mid-command
    /// are not stalled by someone else's probe.
    pub async fn connect(&self) -> bool {
        let attempts = self.config.transport.max_retries + 1;
        for attempt in 0..attempts {
            {
                let mut conn = self.state.lock().await;
                info!(
                    "Connecting to Unreal at {}:{} (attempt {}/{})...",
                    self.config.engine.host,
                    self.config.engine.port,
                    attempt + 1,
                    attempts
                );
                match conn.open(&self.config).await {
                    Ok(()) => {
                        info!("Connected to Unreal Engine");
                        return true;
                    }
                    Err(err) => {
                        warn!("Connection attempt {} failed: {}", attempt + 1, err);
                        conn.last_error = Some(err.to_string());
                        conn.close().await;
                    }
                }
            }
            if attempt + 1 < attempts {
                let delay = policy::retry_delay(
                    attempt,
                    self.config.transport.base_retry_delay(),
                    self.config.transport.max_retry_delay(),
                );
                debug!("Retrying connection in {:?}", delay);
                sleep(delay).await;
            }
        }
        error!("Failed to connect after {} attempts", attempts);
        false
    }

    pub async fn disconnect(&self) {
        let mut conn = self.state.lock().await;
        conn.close().await;
        debug!("Disconnected from Unreal Engine");
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    /// Most recent connection failure, for diagnostics.
    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Send a command and return the engine's response.
    ///
    /// Never returns anything but a mapping: transport failures are
    /// synthesized into `{"status": "error", "error": ...}` after retries
    /// are exhausted, and engine-reported failures are normalized to the
    /// same shape. Callers check `status`, not a Result.
    pub async fn send_command(&self, command: &str, params: Value) -> Value {
        let params = if params.is_null() { json!({}) } else { params };
        let attempts = self.config.transport.max_retries + 1;
        let mut last_error: Option<TransportError> = None;

        for attempt in 0..attempts {
            debug!(
                "Sending command (attempt {}/{}): {}",
                attempt + 1,
                attempts,
                command
            );

            let cycle = {
                let mut conn = self.state.lock().await;
                Self::run_cycle(&mut conn, &self.config, command, &params).await
            };

            match cycle {
                Ok(resp) => {
                    debug!("Command {} completed", command);
                    if let Some(cooldown) = policy::cooldown(command) {
                        if !response::is_error(&resp) {
                            info!(
                                "Heavy command '{}' completed, cooling down {:?} before next command",
                                command, cooldown
                            );
                            sleep(cooldown).await;
                        }
                    }
                    return resp;
                }
                Err(err) if err.is_retryable() => {
                    warn!(
                        "Command failed (attempt {}/{}): {}",
                        attempt + 1,
                        attempts,
                        err
                    );
                    last_error = Some(err);
                    if attempt + 1 < attempts {
                        let delay = policy::retry_delay(
                            attempt,
                            self.config.transport.base_retry_delay(),
                            self.config.transport.max_retry_delay(),
                        );
                        info!("Retrying command in {:?}", delay);
                        sleep(delay).await;
                    }
                }
                Err(err) => {
                    error!("Giving up on '{}': {}", command, err);
                    return response::error_response(err.to_string());
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        response::error_response(format!(
            "Command failed after {} attempts: {}",
            attempts, detail
        ))
    }

    /// One full connection cycle on exclusively held state. The socket is
    /// torn down on every exit path.
    async fn run_cycle(
        conn: &mut Connection,
        config: &Config,
        command: &str,
        params: &Value,
    ) -> Result<Value, TransportError> {
        conn.establish(config).await?;
        let result = Self::exchange(conn, config, command, params).await;
        conn.close().await;
        result
    }

    async fn exchange(
        conn: &mut Connection,
        config: &Config,
        command: &str,
        params: &Value,
    ) -> Result<Value, TransportError> {
        let envelope = json!({ "type": command, "params": params });
        let payload =
            serde_json::to_vec(&envelope).map_err(|e| TransportError::Encode(e.to_string()))?;

        debug!("Sending {} byte payload for '{}'", payload.len(), command);
        conn.send_payload(&payload, config.transport.send_timeout())
            .await?;

        let recv_timeout = if policy::is_large_operation(command) {
            config.transport.large_op_recv_timeout()
        } else {
            config.transport.recv_timeout()
        };
        let raw = conn
            .receive_response(recv_timeout, config.transport.buffer_size)
            .await?;

        let parsed: Value = serde_json::from_slice(&raw)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        let normalized = response::normalize(parsed);
        if response::is_error(&normalized) {
            warn!(
                "Unreal returned error for '{}': {}",
                command,
                normalized
                    .get("error")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown error")
            );
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    fn test_config(addr: SocketAddr) -> Config {
        let mut config = Config::default();
        config.engine.host = addr.ip().to_string();
        config.engine.port = addr.port();
        config.transport.base_retry_delay_ms = 50;
        config.transport.max_retry_delay_ms = 200;
        config.transport.connect_timeout_secs = 2;
        config.transport.send_timeout_secs = 2;
        config.transport.recv_timeout_secs = 1;
        config.transport.large_op_recv_timeout_secs = 2;
        config
    }

    /// Read until the accumulated bytes parse as one JSON document — the
    /// same framing rule the editor plugin applies to requests.
    async fn read_request(stream: &mut TcpStream) -> Value {
        let mut data = Vec::new();
        let mut chunk = vec![0u8; 8192];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "request stream closed before a full envelope");
            data.extend_from_slice(&chunk[..n]);
            if let Ok(value) = serde_json::from_slice::<Value>(&data) {
                return value;
            }
        }
    }

    /// Mock engine answering every connection with a fixed response body.
    async fn spawn_static_engine(response_body: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let _ = read_request(&mut stream).await;
                stream.write_all(response_body.as_bytes()).await.unwrap();
            }
        });
        addr
    }

    /// An address nothing is listening on.
    async fn dead_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
        // listener dropped here; the port refuses connections
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let bridge = EngineBridge::new(&test_config(dead_addr().await));
        assert!(!bridge.is_connected().await);
        bridge.disconnect().await;
        bridge.disconnect().await;
        assert!(!bridge.is_connected().await);
        assert_eq!(bridge.last_error().await, None);
    }

    #[tokio::test]
    async fn connect_retry_bound_when_refused() {
        let bridge = EngineBridge::new(&test_config(dead_addr().await));

        let start = Instant::now();
        let connected = bridge.connect().await;
        let elapsed = start.elapsed();

        assert!(!connected);
        assert!(!bridge.is_connected().await);
        let last = bridge.last_error().await.unwrap();
        assert!(last.contains("refused"), "unexpected error: {last}");
        // 4 attempts, 3 backoff sleeps: 50 + 100 + min(200, 200) = 350ms
        assert!(elapsed >= Duration::from_millis(350), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn connect_then_disconnect_tracks_state() {
        let addr = spawn_static_engine("{}").await;
        let bridge = EngineBridge::new(&test_config(addr));

        assert!(bridge.connect().await);
        assert!(bridge.is_connected().await);
        assert_eq!(bridge.last_error().await, None);

        bridge.disconnect().await;
        assert!(!bridge.is_connected().await);
    }

    #[tokio::test]
    async fn framing_handles_byte_at_a_time_delivery() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            let body = br#"{"status":"success","result":{"actors":["Floor","Wall_0"]}}"#;
            for byte in body {
                stream.write_all(&[*byte]).await.unwrap();
                stream.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        });

        let bridge = EngineBridge::new(&test_config(addr));
        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(
            resp,
            json!({"status":"success","result":{"actors":["Floor","Wall_0"]}})
        );
    }

    #[tokio::test]
    async fn complete_response_then_idle_peer_returns_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            stream
                .write_all(br#"{"status":"success"}"#)
                .await
                .unwrap();
            // Stall without closing; the receiver must not wait for EOF
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let bridge = EngineBridge::new(&test_config(addr));
        let start = Instant::now();
        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp, json!({"status":"success"}));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn timeout_with_incomplete_data_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            stream.write_all(br#"{"partial"#).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let mut config = test_config(addr);
        config.transport.max_retries = 0;
        let bridge = EngineBridge::new(&config);

        let start = Instant::now();
        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp["status"], "error");
        let message = resp["error"].as_str().unwrap();
        assert!(message.contains("timeout"), "unexpected error: {message}");
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn close_before_any_data_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(_) => break,
                };
                let _ = read_request(&mut stream).await;
                // Drop without responding
            }
        });

        let mut config = test_config(addr);
        config.transport.max_retries = 0;
        let bridge = EngineBridge::new(&config);

        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp["status"], "error");
        assert!(
            resp["error"]
                .as_str()
                .unwrap()
                .contains("connection closed before receiving any data")
        );
    }

    #[tokio::test]
    async fn close_with_incomplete_data_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(_) => break,
                };
                let _ = read_request(&mut stream).await;
                stream.write_all(br#"{"broken"#).await.unwrap();
                // Drop mid-document
            }
        });

        let mut config = test_config(addr);
        config.transport.max_retries = 0;
        let bridge = EngineBridge::new(&config);

        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp["status"], "error");
        assert!(resp["error"].as_str().unwrap().contains("incomplete data"));
    }

    #[tokio::test]
    async fn close_after_complete_data_succeeds() {
        let addr = spawn_static_engine(r#"{"status":"success","result":{"ok":true}}"#).await;
        let bridge = EngineBridge::new(&test_config(addr));

        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp, json!({"status":"success","result":{"ok":true}}));
    }

    #[tokio::test]
    async fn concurrent_commands_never_overlap_cycles() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        {
            let active = active.clone();
            let max_active = max_active.clone();
            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    let active = active.clone();
                    let max_active = max_active.clone();
                    tokio::spawn(async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        max_active.fetch_max(now, Ordering::SeqCst);
                        let _ = read_request(&mut stream).await;
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        stream
                            .write_all(br#"{"status":"success"}"#)
                            .await
                            .unwrap();
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            });
        }

        let bridge = Arc::new(EngineBridge::new(&test_config(addr)));
        let a = bridge.clone();
        let b = bridge.clone();
        let (ra, rb) = tokio::join!(
            a.send_command("spawn_actor", json!({"name": "A"})),
            b.send_command("spawn_actor", json!({"name": "B"})),
        );
        assert_eq!(ra["status"], "success");
        assert_eq!(rb["status"], "success");
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cooldown_applies_only_on_success() {
        // Error response: no cooldown
        let addr = spawn_static_engine(r#"{"status":"error","error":"import failed"}"#).await;
        let bridge = EngineBridge::new(&test_config(addr));
        let start = Instant::now();
        let resp = bridge
            .send_command("import_texture", json!({"path": "/tmp/t.png"}))
            .await;
        assert_eq!(resp["status"], "error");
        assert!(start.elapsed() < Duration::from_secs(1));

        // Success response: the 2s import_texture cooldown blocks the caller
        let addr = spawn_static_engine(r#"{"status":"success"}"#).await;
        let bridge = EngineBridge::new(&test_config(addr));
        let start = Instant::now();
        let resp = bridge
            .send_command("import_texture", json!({"path": "/tmp/t.png"}))
            .await;
        assert_eq!(resp["status"], "success");
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn instant_success_no_retries_no_cooldown() {
        let addr = spawn_static_engine(r#"{"status":"success","result":{"actors":[]}}"#).await;
        let bridge = EngineBridge::new(&test_config(addr));

        let start = Instant::now();
        let resp = bridge.send_command("get_actors_in_level", json!({})).await;
        assert_eq!(resp, json!({"status":"success","result":{"actors":[]}}));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn recovers_after_connect_failures_then_applies_cooldown() {
        // Reserve a port, then free it so the first attempts are refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        tokio::spawn(async move {
            // Let two connection attempts fail before the engine comes up
            tokio::time::sleep(Duration::from_millis(200)).await;
            let listener = TcpListener::bind(addr).await.unwrap();
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            assert_eq!(request["type"], "import_texture");
            stream
                .write_all(br#"{"status":"success","result":{"path":"/Game/T"}}"#)
                .await
                .unwrap();
        });

        let bridge = EngineBridge::new(&test_config(addr));
        let start = Instant::now();
        let resp = bridge
            .send_command("import_texture", json!({"path": "/tmp/t.png"}))
            .await;
        let elapsed = start.elapsed();

        assert_eq!(resp, json!({"status":"success","result":{"path":"/Game/T"}}));
        // At least two backoff sleeps (50 + 100ms) plus the 2s cooldown
        assert!(elapsed >= Duration::from_millis(2150), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn engine_reported_failure_is_not_retried() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));

        {
            let connections = connections.clone();
            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    connections.fetch_add(1, Ordering::SeqCst);
                    let _ = read_request(&mut stream).await;
                    stream
                        .write_all(br#"{"success":false,"message":"no such actor"}"#)
                        .await
                        .unwrap();
                }
            });
        }

        let bridge = EngineBridge::new(&test_config(addr));
        let resp = bridge
            .send_command("delete_actor", json!({"name": "Ghost"}))
            .await;

        assert_eq!(resp, json!({"status":"error","error":"no such actor"}));
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn envelope_defaults_null_params_to_empty_object() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            assert_eq!(request["type"], "get_actors_in_level");
            assert_eq!(request["params"], json!({}));
            stream
                .write_all(br#"{"status":"success"}"#)
                .await
                .unwrap();
        });

        let bridge = EngineBridge::new(&test_config(addr));
        let resp = bridge
            .send_command("get_actors_in_level", Value::Null)
            .await;
        assert_eq!(resp["status"], "success");
    }
}
