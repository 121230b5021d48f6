use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;

/// Host value meaning "every interface".
pub const WILDCARD_HOST: &str = "*";

/// Binds the HTTP listener. `*` tries an IPv6 dual-stack socket first and
/// falls back to IPv4 `0.0.0.0`.
pub async fn create_listener(host: &str, port: u16) -> std::io::Result<(String, TcpListener)> {
    if host == WILDCARD_HOST {
        return create_wildcard_listener(port);
    }

    let addr = format!("{}:{}", host, port);
    tracing::info!("Attempting to bind server to {}...", addr);

    let listener = TcpListener::bind(&addr).await?;
    Ok((addr, listener))
}

fn create_wildcard_listener(port: u16) -> std::io::Result<(String, TcpListener)> {
    let v6_addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    tracing::info!(
        "Attempting to bind server to {}... (IPv6 + IPv4 dual-stack)",
        v6_addr
    );
    match bind_socket(Domain::IPV6, v6_addr) {
        Ok(listener) => return Ok((v6_addr.to_string(), listener)),
        Err(e) => tracing::warn!("Failed to bind IPv6 listener: {}. Attempting IPv4 only.", e),
    }

    let v4_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    tracing::info!("Attempting to bind server to {}... (IPv4)", v4_addr);
    let listener = bind_socket(Domain::IPV4, v4_addr)?;
    Ok((v4_addr.to_string(), listener))
}

fn bind_socket(domain: Domain, addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if domain == Domain::IPV6 {
        // Dual-stack is best effort; some systems refuse it
        if let Err(e) = socket.set_only_v6(false) {
            tracing::warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                e
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    TcpListener::from_std(socket.into())
}
