//! The transport-facing view of a completed handshake.

use crate::error::PeerUnverified;
use crate::principal::Principal;
use rustls_pki_types::CertificateDer;
use std::borrow::Cow;

/// Identity material of a completed handshake, as exposed by the transport.
///
/// Implementations are snapshots: every call returns the same answer for the
/// lifetime of the value, and the verifier never retains what it is given.
pub trait Session {
    /// Returns the peer certificate chain, leaf first.
    ///
    /// # Errors
    ///
    /// Returns [`PeerUnverified`] if the peer was not authenticated with
    /// certificates.
    fn peer_certificates(&self) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified>;

    /// Returns the peer principal established by a non-certificate mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`PeerUnverified`] if no principal is available.
    fn peer_principal(&self) -> Result<Principal, PeerUnverified>;

    /// Opaque session identifier, used only for diagnostics.
    fn id(&self) -> &[u8] {
        &[]
    }
}

/// One entry of a peer certificate chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCertificate<'a> {
    /// A DER-encoded X.509 certificate.
    X509(CertificateDer<'a>),
    /// A certificate of some other type (e.g. a raw public key).
    Other {
        /// Certificate type label, as reported by the transport.
        cert_type: Cow<'a, str>,
        /// Encoded certificate bytes.
        encoded: Cow<'a, [u8]>,
    },
}

impl<'a> PeerCertificate<'a> {
    /// Wraps DER-encoded X.509 bytes.
    pub fn x509(der: impl Into<CertificateDer<'a>>) -> Self {
        Self::X509(der.into())
    }

    /// Returns a copy of this entry borrowing from `self`.
    pub fn as_borrowed(&self) -> PeerCertificate<'_> {
        match self {
            Self::X509(der) => PeerCertificate::X509(CertificateDer::from(der.as_ref())),
            Self::Other { cert_type, encoded } => PeerCertificate::Other {
                cert_type: Cow::Borrowed(&**cert_type),
                encoded: Cow::Borrowed(&**encoded),
            },
        }
    }
}

/// An owned [`Session`] for transports that do not expose a session object.
///
/// By default both certificate and principal retrieval report
/// [`PeerUnverified`].
///
/// # Examples
///
/// ```rust
/// use hostname_verifier::{KerberosPrincipal, Session, SessionSnapshot};
///
/// let session = SessionSnapshot::new()
///     .with_principal(KerberosPrincipal::new("HTTP/host.example.com@EXAMPLE.COM")?.into());
///
/// assert!(session.peer_certificates().is_err());
/// assert!(session.peer_principal().is_ok());
/// # Ok::<(), hostname_verifier::PrincipalError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    id: Vec<u8>,
    certificates: Option<Vec<PeerCertificate<'static>>>,
    principal: Option<Principal>,
}

impl SessionSnapshot {
    /// Creates a snapshot with no verified peer identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diagnostic session identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the peer certificate chain, leaf first.
    ///
    /// An empty chain is distinct from an unverified peer: it makes
    /// certificate retrieval succeed with no entries.
    #[must_use]
    pub fn with_certificates<I>(mut self, certificates: I) -> Self
    where
        I: IntoIterator<Item = PeerCertificate<'static>>,
    {
        self.certificates = Some(certificates.into_iter().collect());
        self
    }

    /// Sets the peer principal.
    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }
}

impl Session for SessionSnapshot {
    fn peer_certificates(&self) -> Result<Vec<PeerCertificate<'_>>, PeerUnverified> {
        self.certificates
            .as_ref()
            .map(|certs| certs.iter().map(PeerCertificate::as_borrowed).collect())
            .ok_or(PeerUnverified)
    }

    fn peer_principal(&self) -> Result<Principal, PeerUnverified> {
        self.principal.clone().ok_or(PeerUnverified)
    }

    fn id(&self) -> &[u8] {
        &self.id
    }
}
