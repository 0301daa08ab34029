//! TLS connection setup for the async pool.
//!
//! `diesel-async` delegates TLS to the caller through the manager's
//! `custom_setup` hook. This module wires that hook to `tokio-postgres` with
//! a rustls connector that skips certificate and hostname verification,
//! matching deployments fronted by self-signed certificates. Use only where
//! the network path to the database is already trusted.

use std::sync::Arc;

use diesel::{ConnectionError, ConnectionResult};
use diesel_async::AsyncPgConnection;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use tokio_postgres_rustls::MakeRustlsConnect;

/// Establish one TLS-wrapped `AsyncPgConnection`.
///
/// Signature matches the manager's `custom_setup` callback.
pub(super) fn establish_connection(
    database_url: &str,
) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    let fut = async move {
        let connector = MakeRustlsConnect::new(client_config());
        let (client, connection) = tokio_postgres::connect(database_url, connector)
            .await
            .map_err(|err| ConnectionError::BadConnection(err.to_string()))?;
        AsyncPgConnection::try_from_client_and_connection(client, connection).await
    };
    fut.boxed()
}

fn client_config() -> rustls::ClientConfig {
    let provider = rustls::crypto::ring::default_provider();
    rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerification::new(provider)))
        .with_no_client_auth()
}

/// Certificate verifier that accepts any server certificate.
///
/// Signatures are still checked against the handshake transcript; only the
/// chain and hostname checks are skipped.
#[derive(Debug)]
struct NoVerification {
    provider: CryptoProvider,
}

impl NoVerification {
    fn new(provider: CryptoProvider) -> Self {
        Self { provider }
    }
}

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
