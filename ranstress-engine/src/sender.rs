//! Payload transport
//!
//! One [`Sender`] per worker. Every `send()` call owns its socket for
//! the duration of the call and releases it on every exit path; sockets
//! are never pooled across iterations. All blocking points carry a
//! bounded timeout so a worker can always observe cancellation.

use ranstress_core::{AttackConfig, FailReason, Payload, SendOutcome, Transport};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;
use tracing::trace;

const RESPONSE_BUF_SIZE: usize = 1024;

/// Per-worker transport endpoint
#[derive(Debug, Clone)]
pub struct Sender {
    addr: SocketAddr,
    transport: Transport,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl Sender {
    pub fn new(config: &AttackConfig) -> Self {
        Self {
            addr: config.socket_addr(),
            transport: config.transport,
            connect_timeout: config.connect_timeout,
            response_timeout: config.response_timeout,
        }
    }

    /// Deliver one payload and classify the outcome.
    ///
    /// Per-send failures are returned as values, never as errors; one
    /// bad send must not stop the flood.
    pub async fn send(&self, payload: &Payload) -> SendOutcome {
        match self.transport {
            Transport::Tcp => self.send_tcp(payload).await,
            Transport::Udp => self.send_udp(payload).await,
        }
    }

    async fn send_tcp(&self, payload: &Payload) -> SendOutcome {
        let started = Instant::now();

        let mut stream = match timeout(self.connect_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(_)) | Err(_) => return SendOutcome::Failed(FailReason::Connect),
        };

        // write_all retries partial writes to completion; a short write
        // that cannot be completed surfaces as a write failure, never
        // as success.
        if stream.write_all(payload.data()).await.is_err() {
            return SendOutcome::Failed(FailReason::Write);
        }

        if self.response_timeout.is_zero() {
            return SendOutcome::Sent {
                bytes: payload.len(),
                elapsed: started.elapsed(),
            };
        }

        let mut buf = [0u8; RESPONSE_BUF_SIZE];
        match timeout(self.response_timeout, stream.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => {
                trace!(response_size = n, "response received");
                SendOutcome::SentWithResponse {
                    bytes: payload.len(),
                    response_size: n,
                    elapsed: started.elapsed(),
                }
            }
            // Peer closed or reset after the full write went out; the
            // message was delivered, there is just no reply to count.
            Ok(Ok(_)) | Ok(Err(_)) => SendOutcome::Sent {
                bytes: payload.len(),
                elapsed: started.elapsed(),
            },
            Err(_) => SendOutcome::TimedOut,
        }
    }

    async fn send_udp(&self, payload: &Payload) -> SendOutcome {
        let started = Instant::now();

        let bind_addr: SocketAddr = if self.addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = match UdpSocket::bind(bind_addr).await {
            Ok(socket) => socket,
            Err(_) => return SendOutcome::Failed(FailReason::Connect),
        };

        match socket.send_to(payload.data(), self.addr).await {
            Ok(n) if n == payload.len() => SendOutcome::Sent {
                bytes: n,
                elapsed: started.elapsed(),
            },
            // Datagram truncation cannot be retried, count it as a
            // write failure.
            Ok(_) | Err(_) => SendOutcome::Failed(FailReason::Write),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranstress_core::AttackConfig;
    use std::net::IpAddr;
    use tokio::net::TcpListener;

    fn config_for(addr: SocketAddr, transport: Transport) -> AttackConfig {
        AttackConfig {
            target_ip: addr.ip(),
            target_port: addr.port(),
            transport,
            response_timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_secs(1),
            ..Default::default()
        }
    }

    async fn spawn_echo_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    if let Ok(n) = socket.read(&mut buf).await {
                        if n > 0 {
                            let _ = socket.write_all(&buf[..n]).await;
                        }
                    }
                });
            }
        });
        addr
    }

    /// Accepts and reads but never replies
    async fn spawn_silent_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    loop {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(_) => {}
                        }
                    }
                });
            }
        });
        addr
    }

    async fn unused_port() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    #[tokio::test]
    async fn test_tcp_send_with_response() {
        let addr = spawn_echo_server().await;
        let sender = Sender::new(&config_for(addr, Transport::Tcp));
        let payload = Payload::new(vec![0x01, 0x02, 0x03], "test");

        match sender.send(&payload).await {
            SendOutcome::SentWithResponse {
                bytes,
                response_size,
                ..
            } => {
                assert_eq!(bytes, 3);
                assert_eq!(response_size, 3);
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tcp_connect_refused() {
        let addr = unused_port().await;
        let sender = Sender::new(&config_for(addr, Transport::Tcp));
        let payload = Payload::new(vec![0x01], "test");

        assert_eq!(
            sender.send(&payload).await,
            SendOutcome::Failed(FailReason::Connect)
        );
    }

    #[tokio::test]
    async fn test_tcp_response_timeout() {
        let addr = spawn_silent_server().await;
        let sender = Sender::new(&config_for(addr, Transport::Tcp));
        let payload = Payload::new(vec![0x01, 0x02], "test");

        assert_eq!(sender.send(&payload).await, SendOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_tcp_fire_and_forget_when_timeout_disabled() {
        let addr = spawn_silent_server().await;
        let mut config = config_for(addr, Transport::Tcp);
        config.response_timeout = Duration::ZERO;
        let sender = Sender::new(&config);
        let payload = Payload::new(vec![0x01, 0x02], "test");

        match sender.send(&payload).await {
            SendOutcome::Sent { bytes, .. } => assert_eq!(bytes, 2),
            other => panic!("expected Sent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_udp_send() {
        let sink = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sink.local_addr().unwrap();
        let sender = Sender::new(&config_for(addr, Transport::Udp));
        let payload = Payload::new(vec![0xaa; 16], "test");

        match sender.send(&payload).await {
            SendOutcome::Sent { bytes, .. } => assert_eq!(bytes, 16),
            other => panic!("expected Sent, got {other:?}"),
        }

        let mut buf = [0u8; 64];
        let (n, _) = sink.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &[0xaa; 16]);
    }
}
