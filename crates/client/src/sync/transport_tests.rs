// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use yare::parameterized;

use super::transport::*;

/// What the mock does on one connect call.
#[derive(Debug, Clone)]
pub enum Script {
    /// Accept, deliver `frames`, then either stay open silently or close.
    Open { frames: Vec<Frame>, stay_open: bool },
    /// Reject the connect.
    Refuse(TransportError),
}

#[derive(Default)]
struct MockState {
    scripts: VecDeque<Script>,
    connects: u32,
    disconnects: u32,
    send_attempts: u32,
    sent: Vec<Frame>,
    send_failures: VecDeque<TransportError>,
    disconnect_gate: Option<Arc<Notify>>,
}

/// Handle for inspecting a mock after it moved into a connection task.
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    pub fn connects(&self) -> u32 {
        self.state.lock().unwrap().connects
    }

    pub fn sent(&self) -> Vec<Frame> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn disconnects(&self) -> u32 {
        self.state.lock().unwrap().disconnects
    }

    pub fn send_attempts(&self) -> u32 {
        self.state.lock().unwrap().send_attempts
    }

    pub fn push(&self, script: Script) {
        self.state.lock().unwrap().scripts.push_back(script);
    }

    /// Makes the next send fail with `error`.
    pub fn fail_next_send(&self, error: TransportError) {
        self.state.lock().unwrap().send_failures.push_back(error);
    }

    /// Parks every disconnect until [`MockHandle::release_disconnect`].
    pub fn hold_disconnect(&self) {
        self.state.lock().unwrap().disconnect_gate = Some(Arc::new(Notify::new()));
    }

    pub fn release_disconnect(&self) {
        if let Some(gate) = self.state.lock().unwrap().disconnect_gate.take() {
            gate.notify_one();
        }
    }
}

/// Mock transport for testing without real sockets.
///
/// Each connect consumes the next script. With no script left the
/// connection opens and stays silent.
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    connected: bool,
    incoming: VecDeque<Frame>,
    stay_open: bool,
}

impl MockTransport {
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        let transport = MockTransport {
            state: Arc::clone(&state),
            connected: false,
            incoming: VecDeque::new(),
            stay_open: true,
        };
        (transport, MockHandle { state })
    }

    pub fn scripted(scripts: Vec<Script>) -> (Self, MockHandle) {
        let (transport, handle) = Self::new();
        for script in scripts {
            handle.push(script);
        }
        (transport, handle)
    }
}

impl Transport for MockTransport {
    fn connect(
        &mut self,
        _url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let script = {
                let mut state = self.state.lock().unwrap();
                state.connects += 1;
                state.scripts.pop_front()
            };
            match script {
                Some(Script::Refuse(e)) => Err(e),
                Some(Script::Open { frames, stay_open }) => {
                    self.incoming = frames.into();
                    self.stay_open = stay_open;
                    self.connected = true;
                    Ok(())
                }
                None => {
                    self.incoming.clear();
                    self.stay_open = true;
                    self.connected = true;
                    Ok(())
                }
            }
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let gate = {
                let mut state = self.state.lock().unwrap();
                state.disconnects += 1;
                state.disconnect_gate.clone()
            };
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.connected = false;
            Ok(())
        })
    }

    fn send(
        &mut self,
        frame: Frame,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            let mut state = self.state.lock().unwrap();
            state.send_attempts += 1;
            if let Some(error) = state.send_failures.pop_front() {
                return Err(error);
            }
            state.sent.push(frame);
            Ok(())
        })
    }

    fn recv(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<Option<Frame>>> + Send + '_>> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            if let Some(frame) = self.incoming.pop_front() {
                return Ok(Some(frame));
            }
            if self.stay_open {
                std::future::pending::<()>().await;
            }
            self.connected = false;
            Ok(None)
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let (mut transport, handle) = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());
    assert_eq!(handle.connects(), 1);

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_scripted_session() {
    let (mut transport, handle) = MockTransport::scripted(vec![
        Script::Refuse(TransportError::AuthFailed),
        Script::Open {
            frames: vec![Frame::Text("one".into())],
            stay_open: false,
        },
    ]);

    let err = transport.connect("ws://localhost:1234").await.unwrap_err();
    assert_eq!(err, TransportError::AuthFailed);

    transport.connect("ws://localhost:1234").await.unwrap();
    transport.send(Frame::Text("hello".into())).await.unwrap();
    assert_eq!(transport.recv().await.unwrap(), Some(Frame::Text("one".into())));
    assert_eq!(transport.recv().await.unwrap(), None);
    assert!(!transport.is_connected());
    assert_eq!(handle.sent(), vec![Frame::Text("hello".into())]);
}

#[tokio::test]
async fn test_mock_transport_scripted_send_failure() {
    let (mut transport, handle) = MockTransport::new();
    transport.connect("ws://localhost:1234").await.unwrap();
    handle.fail_next_send(TransportError::SendFailed("broken pipe".into()));

    let first = transport.send(Frame::Text("a".into())).await;
    let second = transport.send(Frame::Text("b".into())).await;

    assert_eq!(first, Err(TransportError::SendFailed("broken pipe".into())));
    assert_eq!(second, Ok(()));
    assert_eq!(handle.send_attempts(), 2);
    assert_eq!(handle.sent(), vec![Frame::Text("b".into())]);
}

#[tokio::test]
async fn test_mock_transport_send_requires_connection() {
    let (mut transport, _) = MockTransport::new();
    let result = transport.send(Frame::Text("x".into())).await;
    assert_eq!(result, Err(TransportError::ConnectionClosed));
}

#[parameterized(
    text = { Frame::Text("{}".into()), b"{}" as &[u8] },
    binary = { Frame::Binary(vec![1, 2, 3]), &[1u8, 2, 3] as &[u8] },
)]
fn frame_payload(frame: Frame, expected: &[u8]) {
    assert_eq!(frame.payload(), expected);
}

#[test]
fn bearer_header_value() {
    let value = bearer("s3cret").unwrap();
    assert_eq!(value.to_str().unwrap(), "Bearer s3cret");
}

#[test]
fn bearer_rejects_control_characters() {
    assert_eq!(bearer("bad\ntoken").unwrap_err(), TransportError::AuthFailed);
}

#[test]
fn static_token_provider() {
    let provider = StaticToken("abc".to_string());
    assert_eq!(provider.token().as_deref(), Some("abc"));
}

#[test]
fn test_websocket_transport_new() {
    let transport = WebSocketTransport::new();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_missing_token_fails_connect() {
    struct NoToken;
    impl TokenProvider for NoToken {
        fn token(&self) -> Option<String> {
            None
        }
    }

    let mut transport = WebSocketTransport::new().with_auth(Arc::new(NoToken));
    let err = transport.connect("ws://127.0.0.1:1/stream").await.unwrap_err();
    assert_eq!(err, TransportError::AuthFailed);
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_recv_without_connection() {
    let mut transport = WebSocketTransport::new();
    let result = transport.recv().await;
    assert!(matches!(result, Err(TransportError::ConnectionClosed)));
}
