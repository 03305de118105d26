//! [`Session`] for `rustls` connections.
//!
//! rustls has no non-certificate peer authentication, so `peer_principal`
//! always reports [`PeerUnverified`]. Until the handshake has produced peer
//! certificates, `peer_certificates` reports [`PeerUnverified`] as well.

use crate::error::PeerUnverified;
use crate::principal::Principal;
use crate::session::{PeerCertificate, Session};
use rustls::pki_types::CertificateDer;

fn certificates_of(
    state: &rustls::CommonState,
) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified> {
    let certs = state.peer_certificates().ok_or(PeerUnverified)?;
    Ok(certs
        .iter()
        .map(|cert| PeerCertificate::X509(CertificateDer::from(cert.as_ref())))
        .collect())
}

impl Session for rustls::CommonState {
    fn peer_certificates(&self) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified> {
        certificates_of(self)
    }

    fn peer_principal(&self) -> Result<Principal, PeerUnverified> {
        Err(PeerUnverified)
    }
}

impl Session for rustls::ClientConnection {
    fn peer_certificates(&self) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified> {
        certificates_of(self)
    }

    fn peer_principal(&self) -> Result<Principal, PeerUnverified> {
        Err(PeerUnverified)
    }
}

impl Session for rustls::ServerConnection {
    fn peer_certificates(&self) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified> {
        certificates_of(self)
    }

    fn peer_principal(&self) -> Result<Principal, PeerUnverified> {
        Err(PeerUnverified)
    }
}
