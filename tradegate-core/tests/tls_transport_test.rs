//! End-to-end tests for the TLS transport: real sockets, real
//! handshakes, throwaway self-signed certificates.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rustls::pki_types::{CertificateDer, ServerName};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_rustls::TlsConnector;

use tradegate_core::comms::{frame, TlsTransport, Transport, TransportError};
use tradegate_core::model::{Request, RequestType, Response};
use tradegate_core::server::{Command, CommandRegistry, TradingServerFacade};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

struct TestCerts {
    // Keeps the temp directory alive for the duration of a test.
    _dir: tempfile::TempDir,
    cert_path: PathBuf,
    key_path: PathBuf,
    cert_der: CertificateDer<'static>,
}

fn make_certs() -> Result<TestCerts> {
    let signed = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])?;
    let dir = tempfile::tempdir()?;
    let cert_path = dir.path().join("server.crt");
    let key_path = dir.path().join("server.key");
    std::fs::write(&cert_path, signed.cert.pem())?;
    std::fs::write(&key_path, signed.key_pair.serialize_pem())?;
    Ok(TestCerts {
        cert_der: signed.cert.der().clone(),
        _dir: dir,
        cert_path,
        key_path,
    })
}

async fn start_transport(certs: &TestCerts) -> Result<TlsTransport> {
    let transport = TlsTransport::new("127.0.0.1", 0, &certs.cert_path, &certs.key_path);
    transport.start().await?;
    Ok(transport)
}

/// Connects a TLS client that trusts exactly the test certificate.
async fn connect_client(
    transport: &TlsTransport,
    cert_der: CertificateDer<'static>,
) -> Result<tokio_rustls::client::TlsStream<TcpStream>> {
    let addr = transport.local_addr().expect("transport not started");

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert_der)?;
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let tcp = TcpStream::connect(addr).await?;
    let name = ServerName::try_from("localhost")?.to_owned();
    Ok(connector.connect(name, tcp).await?)
}

/// Polls until the accept loop has promoted a connection.
async fn wait_for_active(transport: &TlsTransport) {
    for _ in 0..200 {
        if transport.has_active_connection().await {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("no active connection was promoted");
}

async fn write_frame<S: AsyncWriteExt + Unpin>(stream: &mut S, payload: &[u8]) -> Result<()> {
    stream
        .write_all(&frame::encode_len(payload.len() as u32))
        .await?;
    stream.write_all(payload).await?;
    stream.flush().await?;
    Ok(())
}

async fn read_frame<S: AsyncReadExt + Unpin>(stream: &mut S) -> Result<Vec<u8>> {
    let mut header = [0u8; frame::LEN_PREFIX_SIZE];
    stream.read_exact(&mut header).await?;
    let mut payload = vec![0u8; frame::decode_len(header) as usize];
    stream.read_exact(&mut payload).await?;
    Ok(payload)
}

struct EchoCommand {
    request: Request,
}

#[async_trait]
impl Command for EchoCommand {
    async fn execute(self: Box<Self>) -> Result<Response> {
        Ok(Response::ok("ok", self.request.into_payload()))
    }
}

#[tokio::test]
async fn end_to_end_echo_scenario() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;
    let mut client = connect_client(&transport, certs.cert_der.clone()).await?;
    wait_for_active(&transport).await;

    // The exact bytes from the wire protocol: length 5, then "hello".
    client.write_all(&[0x00, 0x00, 0x00, 0x05]).await?;
    client.write_all(b"hello").await?;
    client.flush().await?;

    let received = timeout(TEST_TIMEOUT, transport.recv_bytes()).await??;
    assert_eq!(received, b"hello");

    // Dispatch through a facade with an echo command for the example tag.
    let mut registry = CommandRegistry::new();
    registry.register(
        RequestType::GetMarketData,
        Box::new(|request| Box::new(EchoCommand { request })),
    );
    let facade = TradingServerFacade::new(registry);
    let response = facade
        .handle(Request::new(RequestType::GetMarketData, received))
        .await;
    assert!(response.is_success());
    assert_eq!(response.get_message(), "ok");
    assert_eq!(response.get_data(), b"hello");

    transport.send_bytes(&response.encode()?).await?;
    let reply = timeout(TEST_TIMEOUT, read_frame(&mut client)).await??;
    assert_eq!(Response::decode(&reply)?, response);

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn empty_payload_frame_is_not_an_error() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;
    let mut client = connect_client(&transport, certs.cert_der.clone()).await?;
    wait_for_active(&transport).await;

    write_frame(&mut client, &[]).await?;
    let received = timeout(TEST_TIMEOUT, transport.recv_bytes()).await??;
    assert!(received.is_empty());

    transport.send_bytes(&[]).await?;
    let reply = timeout(TEST_TIMEOUT, read_frame(&mut client)).await??;
    assert!(reply.is_empty());

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn io_without_a_peer_fails_with_no_active_connection() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;

    assert!(matches!(
        transport.send_bytes(b"x").await.unwrap_err(),
        TransportError::NoActiveConnection
    ));
    assert!(matches!(
        transport.recv_bytes().await.unwrap_err(),
        TransportError::NoActiveConnection
    ));

    transport.stop().await?;

    // Same failure mode after shutdown.
    assert!(matches!(
        transport.send_bytes(b"x").await.unwrap_err(),
        TransportError::NoActiveConnection
    ));
    Ok(())
}

#[tokio::test]
async fn stop_is_idempotent() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;
    let addr = transport.local_addr().expect("bound address");

    transport.stop().await?;
    transport.stop().await?;
    assert!(transport.local_addr().is_none());

    // The port is free again: a fresh transport can claim it.
    let rebound = TlsTransport::new("127.0.0.1", addr.port(), &certs.cert_path, &certs.key_path);
    rebound.start().await?;
    rebound.stop().await?;
    Ok(())
}

#[tokio::test]
async fn start_is_idempotent() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;
    let addr = transport.local_addr();

    transport.start().await?;
    assert_eq!(transport.local_addr(), addr);

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn newest_handshaked_peer_replaces_the_active_connection() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;

    let _first = connect_client(&transport, certs.cert_der.clone()).await?;
    wait_for_active(&transport).await;

    let mut second = connect_client(&transport, certs.cert_der.clone()).await?;
    // Give the accept loop time to promote the replacement.
    sleep(Duration::from_millis(200)).await;

    transport.send_bytes(b"to the newest peer").await?;
    let received = timeout(TEST_TIMEOUT, read_frame(&mut second)).await??;
    assert_eq!(received, b"to the newest peer");

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn handshake_failure_rearms_accept() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;
    let addr = transport.local_addr().expect("bound address");

    // A plain-TCP peer that speaks garbage fails the TLS handshake.
    {
        let mut garbage = TcpStream::connect(addr).await?;
        garbage.write_all(b"definitely not a client hello").await?;
        garbage.flush().await?;
    }
    sleep(Duration::from_millis(200)).await;
    assert!(!transport.has_active_connection().await);

    // The server is still accepting: a real client gets promoted.
    let mut client = connect_client(&transport, certs.cert_der.clone()).await?;
    wait_for_active(&transport).await;

    write_frame(&mut client, b"still alive").await?;
    let received = timeout(TEST_TIMEOUT, transport.recv_bytes()).await??;
    assert_eq!(received, b"still alive");

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn oversized_length_prefix_drops_the_connection() -> Result<()> {
    let certs = make_certs()?;
    let transport = TlsTransport::new("127.0.0.1", 0, &certs.cert_path, &certs.key_path)
        .with_max_frame_len(1024);
    transport.start().await?;

    let mut client = connect_client(&transport, certs.cert_der.clone()).await?;
    wait_for_active(&transport).await;

    client.write_all(&frame::encode_len(u32::MAX)).await?;
    client.flush().await?;

    let err = timeout(TEST_TIMEOUT, transport.recv_bytes()).await?.unwrap_err();
    assert!(matches!(err, TransportError::OversizedFrame(len) if len == u32::MAX));
    assert!(!transport.has_active_connection().await);

    transport.stop().await?;
    Ok(())
}

#[tokio::test]
async fn peer_disconnect_mid_frame_is_an_io_error() -> Result<()> {
    let certs = make_certs()?;
    let transport = start_transport(&certs).await?;

    {
        let mut client = connect_client(&transport, certs.cert_der.clone()).await?;
        wait_for_active(&transport).await;
        // Announce 5 payload bytes but deliver only 2, then vanish.
        client.write_all(&[0x00, 0x00, 0x00, 0x05]).await?;
        client.write_all(b"he").await?;
        client.flush().await?;
        client.shutdown().await?;
    }

    let err = timeout(TEST_TIMEOUT, transport.recv_bytes()).await?.unwrap_err();
    assert!(matches!(err, TransportError::Io(_)));
    assert!(!transport.has_active_connection().await);

    transport.stop().await?;
    Ok(())
}
