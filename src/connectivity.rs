use http::Uri;
use log::debug;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Whether remote calls are worth attempting right now.
pub trait NetworkConnectivity {
    fn is_network_available(&self) -> bool;
}

/// Reachability check by opening a TCP connection to the API host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe the host and port of `base_url`. Returns `None` when the URL has
    /// no host.
    pub fn for_base_url(base_url: &str, timeout: Duration) -> Option<Self> {
        let uri: Uri = base_url.parse().ok()?;
        let host = uri.host()?.to_string();
        let port = uri
            .port_u16()
            .unwrap_or(if uri.scheme_str() == Some("https") { 443 } else { 80 });
        Some(TcpProbe { host, port, timeout })
    }

    pub fn target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

impl NetworkConnectivity for TcpProbe {
    fn is_network_available(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("Connectivity: cannot resolve {}: {}", self.host, e);
                return false;
            }
        };
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }
        debug!("Connectivity: {}:{} unreachable", self.host, self.port);
        false
    }
}
