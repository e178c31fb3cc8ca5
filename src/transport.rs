//! One-shot confirmed-exchange UDP client: send once, await the first
//! datagram or a fixed timeout, then close the socket.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::error::TransportError;

/// Fixed confirmed-exchange timeout (§5).
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(1);

/// Datagrams this large are never produced by this codec, but a generous
/// receive buffer avoids truncating a legitimate oversized reply.
const RECV_BUFFER_LEN: usize = 2048;

/// A single confirmed request/response exchange against one peer.
///
/// Stateless across calls: each [`UdpClient::exchange`] opens its own socket
/// and closes it before returning, so two concurrent exchanges never share a
/// socket (the fixed invoke id of 1 means responses could not otherwise be
/// correlated).
pub struct UdpClient {
    peer: SocketAddr,
    /// Checked once at construction from the `DEBUG` environment variable;
    /// gates hex dumps of outbound/inbound frames through `log::debug!`.
    debug: bool,
}

impl UdpClient {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            debug: std::env::var_os("DEBUG").is_some(),
        }
    }

    /// Send `request` to the configured peer and return the first datagram
    /// received within [`EXCHANGE_TIMEOUT`].
    pub async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        let local_addr: SocketAddr = if self.peer.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };

        let socket = UdpSocket::bind(local_addr).await.map_err(TransportError::Bind)?;
        socket.connect(self.peer).await.map_err(TransportError::Bind)?;
        if self.debug {
            log::debug!("-> {} {}", self.peer, hex::encode(request));
        }
        socket.send(request).await.map_err(TransportError::Send)?;

        let mut buf = [0u8; RECV_BUFFER_LEN];
        let recv = timeout(EXCHANGE_TIMEOUT, socket.recv(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout(EXCHANGE_TIMEOUT))?
            .map_err(TransportError::Receive)?;

        if self.debug {
            log::debug!("<- {} {}", self.peer, hex::encode(&buf[..recv]));
        }
        Ok(buf[..recv].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exchange_times_out_against_unreachable_peer() {
        let client = UdpClient::new("127.0.0.1:1".parse().unwrap());
        let started = std::time::Instant::now();
        let result = client.exchange(&[0x81, 0x0a, 0x00, 0x04]).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn exchange_round_trips_with_an_echo_peer() {
        let echo = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let echo_addr = echo.local_addr().unwrap();

        let echo_task = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (n, from) = echo.recv_from(&mut buf).await.unwrap();
            echo.send_to(&buf[..n], from).await.unwrap();
        });

        let client = UdpClient::new(echo_addr);
        let response = client.exchange(b"ping").await.unwrap();
        assert_eq!(response, b"ping");
        echo_task.await.unwrap();
    }
}
