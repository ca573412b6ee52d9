//! Framed TCP/TLS transport and connection setup.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::encode::WireLine;
use crate::endpoint::EndpointDescriptor;
use crate::error::{ConnectError, ProtocolError};
use crate::line::LineCodec;

/// Any byte stream the client can speak IRC over.
pub trait IoStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IoStream for T {}

/// An open connection to the server, framed into lines.
pub struct Transport {
    framed: Framed<Box<dyn IoStream>, LineCodec>,
    tls: bool,
}

impl Transport {
    /// Wrap a plain TCP stream.
    pub fn tcp(stream: TcpStream) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Self::framed(Box::new(stream), false)
    }

    /// Wrap an established TLS stream.
    pub fn tls(stream: TlsStream<TcpStream>) -> Self {
        if let Err(e) = Self::enable_keepalive(stream.get_ref().0) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Self::framed(Box::new(stream), true)
    }

    /// Wrap any other stream, e.g. an in-memory duplex pipe.
    pub fn from_stream<S: IoStream + 'static>(stream: S) -> Self {
        Self::framed(Box::new(stream), false)
    }

    fn framed(stream: Box<dyn IoStream>, tls: bool) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::new()),
            tls,
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    /// Whether the connection is TLS-wrapped.
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// Read the next raw line, terminator included.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        self.framed.next().await.transpose()
    }

    /// Write one encoded line and flush it.
    pub async fn write_line(&mut self, line: WireLine) -> Result<(), ProtocolError> {
        self.framed.send(line).await
    }
}

/// Open the connection described by `endpoint` within `timeout`.
///
/// TLS is used when the endpoint asks for it. With `accept_invalid_certs`
/// the server certificate is not verified.
pub async fn connect(
    endpoint: &EndpointDescriptor,
    timeout: Duration,
    accept_invalid_certs: bool,
) -> Result<Transport, ConnectError> {
    match tokio::time::timeout(timeout, dial(endpoint, accept_invalid_certs)).await {
        Ok(result) => result,
        Err(_) => Err(ConnectError::Timeout {
            addr: endpoint.addr(),
            timeout,
        }),
    }
}

async fn dial(
    endpoint: &EndpointDescriptor,
    accept_invalid_certs: bool,
) -> Result<Transport, ConnectError> {
    let addr = endpoint.addr();
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ConnectError::Io {
            addr: addr.clone(),
            source,
        })?;
    debug!(addr = %addr, "TCP connected");

    if !endpoint.use_tls {
        return Ok(Transport::tcp(stream));
    }

    let connector = TlsConnector::from(Arc::new(tls_config(accept_invalid_certs)));
    let server_name = ServerName::try_from(endpoint.host.clone())
        .map_err(|_| ConnectError::InvalidServerName(endpoint.host.clone()))?;
    let stream = connector
        .connect(server_name, stream)
        .await
        .map_err(|source| ConnectError::Tls { addr: addr.clone(), source })?;
    debug!(addr = %addr, "TLS handshake complete");
    Ok(Transport::tls(stream))
}

fn tls_config(accept_invalid_certs: bool) -> rustls::ClientConfig {
    if accept_invalid_certs {
        return rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerifier))
            .with_no_client_auth();
    }

    let root_store = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Accepts any server certificate.
#[derive(Debug)]
struct NoVerifier;

impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
