//! Transport-layer authentication state attached to a call.
//!
//! RPC frameworks expose peer information in different shapes. The
//! authenticator only needs to know three things: whether the call came in
//! over the RPC transport at all, whether that transport is TLS, and which
//! certificates the client presented. [`PeerContext`] is the narrow capability
//! that yields exactly that; [`CallContext`] is the stock carrier.

use std::net::SocketAddr;

use rustls::pki_types::CertificateDer;

/// Capability yielding the transport peer of a call, if any.
pub trait PeerContext {
    /// Peer information, or `None` when the call did not arrive over the RPC
    /// transport (e.g. an in-process invocation).
    fn peer(&self) -> Option<&Peer>;
}

/// Per-call context carrying optional peer information.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    peer: Option<Peer>,
}

impl CallContext {
    /// A context with no transport information attached.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose call arrived from `peer`.
    #[must_use]
    pub fn with_peer(peer: Peer) -> Self {
        Self { peer: Some(peer) }
    }
}

impl PeerContext for CallContext {
    fn peer(&self) -> Option<&Peer> {
        self.peer.as_ref()
    }
}

impl PeerContext for Option<Peer> {
    fn peer(&self) -> Option<&Peer> {
        self.as_ref()
    }
}

/// The remote end of a connection.
#[derive(Debug, Clone, Default)]
pub struct Peer {
    /// Remote socket address, when the transport knows it.
    pub addr: Option<SocketAddr>,
    /// TLS state; `None` for plaintext connections.
    pub tls: Option<TlsInfo>,
}

impl Peer {
    /// A peer on a plaintext connection.
    #[must_use]
    pub fn plaintext(addr: Option<SocketAddr>) -> Self {
        Self { addr, tls: None }
    }

    /// A peer on a TLS connection.
    #[must_use]
    pub fn tls(addr: Option<SocketAddr>, tls: TlsInfo) -> Self {
        Self {
            addr,
            tls: Some(tls),
        }
    }
}

/// Handshake state of a TLS connection.
#[derive(Debug, Clone, Default)]
pub struct TlsInfo {
    /// Certificates presented by the client, leaf first.
    pub peer_certificates: Vec<CertificateDer<'static>>,
    /// Negotiated protocol version.
    pub protocol_version: Option<rustls::ProtocolVersion>,
    /// Negotiated ALPN protocol.
    pub alpn_protocol: Option<Vec<u8>>,
    /// SNI hostname sent by the client.
    pub server_name: Option<String>,
}

impl TlsInfo {
    /// TLS state carrying just the presented certificate chain.
    #[must_use]
    pub fn with_certificates(peer_certificates: Vec<CertificateDer<'static>>) -> Self {
        Self {
            peer_certificates,
            ..Self::default()
        }
    }

    /// Snapshot the handshake state of a rustls server connection.
    ///
    /// Call after the handshake completed; before that the connection has no
    /// peer certificates yet and the snapshot will say so.
    #[must_use]
    pub fn from_connection(conn: &rustls::ServerConnection) -> Self {
        Self {
            peer_certificates: conn
                .peer_certificates()
                .map(<[CertificateDer<'static>]>::to_vec)
                .unwrap_or_default(),
            protocol_version: conn.protocol_version(),
            alpn_protocol: conn.alpn_protocol().map(<[u8]>::to_vec),
            server_name: conn.server_name().map(str::to_owned),
        }
    }

    /// The leaf certificate, if the client presented any.
    #[must_use]
    pub fn leaf(&self) -> Option<&CertificateDer<'static>> {
        self.peer_certificates.first()
    }

    /// Everything after the leaf, in presentation order.
    #[must_use]
    pub fn intermediates(&self) -> &[CertificateDer<'static>] {
        self.peer_certificates.get(1..).unwrap_or_default()
    }
}
