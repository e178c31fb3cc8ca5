//! Concurrent broadcast-send / response-collect discovery loop.
//!
//! Socket setup follows the reuse-address/reuse-port/broadcast idiom used by
//! other BACnet discovery tooling for the same reason: a BACnet/IP stack
//! already bound to port 47808 elsewhere on the host must not prevent this
//! one-shot discovery socket from binding.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;

use crate::encoding::encode_discovery_frame;
use crate::error::TransportError;
use crate::frame::BACNET_IP_PORT;

/// Default collection window when the caller does not specify one.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);
/// Interval between broadcast sends while discovery is running.
const BROADCAST_INTERVAL: Duration = Duration::from_millis(100);

const GLOBAL_BROADCAST: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(255, 255, 255, 255), BACNET_IP_PORT));

fn bind_broadcast_socket() -> Result<UdpSocket, TransportError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(TransportError::Bind)?;
    socket.set_reuse_address(true).map_err(TransportError::Bind)?;
    #[cfg(target_os = "linux")]
    socket.set_reuse_port(true).map_err(TransportError::Bind)?;
    socket.set_broadcast(true).map_err(TransportError::Bind)?;
    socket.set_nonblocking(true).map_err(TransportError::Bind)?;

    let addr: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), BACNET_IP_PORT);
    socket.bind(&addr.into()).map_err(TransportError::Bind)?;

    UdpSocket::from_std(socket.into()).map_err(TransportError::Bind)
}

/// Per-interface IPv4 broadcast addresses, falling back to the global
/// broadcast address when interface enumeration is unavailable or empty.
fn broadcast_targets() -> Vec<SocketAddr> {
    let mut targets = Vec::new();
    if let Ok(interfaces) = if_addrs::get_if_addrs() {
        for iface in interfaces {
            if iface.is_loopback() {
                continue;
            }
            if let if_addrs::IfAddr::V4(v4) = iface.addr {
                if let Some(broadcast) = v4.broadcast {
                    targets.push(SocketAddr::new(IpAddr::V4(broadcast), BACNET_IP_PORT));
                }
            }
        }
    }
    if targets.is_empty() {
        targets.push(GLOBAL_BROADCAST);
    }
    targets
}

/// Broadcast a discovery probe and collect responding peer addresses for
/// `timeout`. Returns an arbitrary-order list of responding IPs; duplicates
/// are coalesced.
pub async fn discover(timeout: Duration) -> Result<Vec<IpAddr>, TransportError> {
    let socket = Arc::new(bind_broadcast_socket()?);
    let frame = encode_discovery_frame();
    let targets = broadcast_targets();

    let found = Arc::new(Mutex::new(HashSet::new()));

    let sender_socket = Arc::clone(&socket);
    let sender = tokio::spawn(async move {
        loop {
            for target in &targets {
                let _ = sender_socket.send_to(&frame, *target).await;
            }
            tokio::time::sleep(BROADCAST_INTERVAL).await;
        }
    });

    let receiver_socket = Arc::clone(&socket);
    let receiver_found = Arc::clone(&found);
    let receiver = tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        loop {
            match receiver_socket.recv_from(&mut buf).await {
                Ok((n, from)) => {
                    if crate::decoding::is_discovery_response(&buf[..n]) {
                        receiver_found.lock().await.insert(from.ip());
                    }
                }
                Err(err) => {
                    log::debug!("discovery receiver error (ignored): {err}");
                }
            }
        }
    });

    tokio::time::sleep(timeout).await;
    sender.abort();
    receiver.abort();

    let result = found.lock().await.iter().copied().collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_empty_set_when_nobody_responds() {
        let started = std::time::Instant::now();
        let result = discover(Duration::from_millis(200)).await.unwrap();
        assert!(result.is_empty());
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
