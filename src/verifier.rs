//! Post-handshake hostname verification.
//!
//! [`HostnameVerifier`] reduces the identity material of a [`Session`] to a
//! single verdict. Certificates are the normative identity mechanism: a
//! Kerberos principal is consulted only when the transport reports that no
//! certificate identity exists, never after a certificate failed to match.

use crate::checker::{HostnameChecker, X509Checker};
use crate::error::{CheckError, PeerUnverified};
use crate::prelude::{debug, warn};
use crate::principal::Principal;
use crate::session::{PeerCertificate, Session};
use std::fmt;
use std::sync::Arc;

/// Decides whether a session's peer identity is valid for a hostname.
///
/// Implementations never fail: anything short of a positive match is `false`.
/// Implementations must be thread-safe.
pub trait Verifier: Send + Sync + 'static {
    /// Returns `true` if the peer of `session` is `hostname`.
    fn verify(&self, hostname: &str, session: &dyn Session) -> bool;
}

// ---- ergonomic blanket impl (closures / function pointers) ----

impl<F> Verifier for F
where
    F: Fn(&str, &dyn Session) -> bool + Send + Sync + 'static,
{
    fn verify(&self, hostname: &str, session: &dyn Session) -> bool {
        self(hostname, session)
    }
}

impl Verifier for Arc<dyn Verifier> {
    fn verify(&self, hostname: &str, session: &dyn Session) -> bool {
        (**self).verify(hostname, session)
    }
}

impl Verifier for Box<dyn Verifier> {
    fn verify(&self, hostname: &str, session: &dyn Session) -> bool {
        (**self).verify(hostname, session)
    }
}

/// Verifies that the peer of a completed handshake is the intended host.
///
/// 1. If the session has peer certificates, the leaf must be X.509 and must
///    match the hostname.
/// 2. If the session reports the peer as unverified, a Kerberos peer
///    principal is matched instead.
/// 3. If neither matched and a fallback verifier is configured, its verdict
///    is returned.
///
/// A verifier is immutable once built and can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use hostname_verifier::{HostnameVerifier, KerberosPrincipal, SessionSnapshot, Verifier};
///
/// let verifier = HostnameVerifier::new();
///
/// let session = SessionSnapshot::new()
///     .with_principal(KerberosPrincipal::new("HTTP/host.example.com@EXAMPLE.COM")?.into());
///
/// assert!(verifier.verify("host.example.com", &session));
/// assert!(!verifier.verify("other.example.com", &session));
/// # Ok::<(), hostname_verifier::PrincipalError>(())
/// ```
pub struct HostnameVerifier {
    checker: Arc<dyn HostnameChecker>,
    fallback: Option<Box<dyn Verifier>>,
}

impl fmt::Debug for HostnameVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostnameVerifier")
            .field("checker", &"<Arc<dyn HostnameChecker>>")
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Default for HostnameVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HostnameVerifier {
    /// Creates a verifier using [`X509Checker`] and no fallback.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder to configure the checker and fallback.
    pub fn builder() -> HostnameVerifierBuilder {
        HostnameVerifierBuilder::new()
    }

    /// Returns `true` if a fallback verifier is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn hostname_matches(&self, hostname: &str, session: &dyn Session) -> bool {
        debug!("hostname = {hostname}, session = {}", SessionId(session.id()));

        match session.peer_certificates() {
            Ok(certificates) => self.certificate_matches(hostname, &certificates),
            Err(PeerUnverified) => {
                debug!("not using certificates for peer, trying the peer principal");
                self.principal_matches(hostname, session)
            }
        }
    }

    fn certificate_matches(&self, hostname: &str, certificates: &[PeerCertificate<'_>]) -> bool {
        match certificates.first() {
            None => {
                debug!("no peer certificates");
                false
            }
            Some(PeerCertificate::X509(leaf)) => {
                match self.checker.match_certificate(hostname, leaf) {
                    Ok(()) => true,
                    Err(e @ CheckError::MalformedCertificate(_)) => {
                        warn!("peer leaf certificate for {hostname} is unreadable: {e}");
                        false
                    }
                    Err(e) => {
                        debug!("certificate does not match hostname: {e}");
                        false
                    }
                }
            }
            Some(PeerCertificate::Other { cert_type, .. }) => {
                debug!("peer leaf certificate is {cert_type}, not X.509");
                false
            }
        }
    }

    fn principal_matches(&self, hostname: &str, session: &dyn Session) -> bool {
        let principal = match session.peer_principal() {
            Ok(principal) => principal,
            Err(e) => {
                debug!("can't verify principal, no principal: {e}");
                return false;
            }
        };

        match &principal {
            Principal::Kerberos(kerberos) => {
                debug!(
                    "peer principal host = {}",
                    kerberos.hostname().unwrap_or("<none>")
                );
                match self.checker.match_principal(hostname, &principal) {
                    Ok(()) => true,
                    Err(e) => {
                        debug!("principal does not match hostname: {e}");
                        false
                    }
                }
            }
            Principal::Other(_) => {
                debug!("can't verify principal, not Kerberos");
                false
            }
        }
    }
}

impl Verifier for HostnameVerifier {
    /// Verifies the hostname against the session's peer identity, falling back
    /// to the configured fallback verifier if there is no match.
    fn verify(&self, hostname: &str, session: &dyn Session) -> bool {
        if self.hostname_matches(hostname, session) {
            return true;
        }

        match &self.fallback {
            Some(fallback) => {
                debug!("no match for {hostname}, consulting fallback verifier");
                fallback.verify(hostname, session)
            }
            None => false,
        }
    }
}

/// Builds a [`HostnameVerifier`].
///
/// Defaults:
/// - Checker: [`X509Checker`]
/// - Fallback: none
///
/// # Examples
///
/// ```rust
/// use hostname_verifier::{HostnameVerifier, Session, X509Checker};
///
/// let verifier = HostnameVerifier::builder()
///     .checker(X509Checker::new())
///     .fallback(|hostname: &str, _session: &dyn Session| hostname == "localhost")
///     .build();
///
/// assert!(verifier.has_fallback());
/// ```
pub struct HostnameVerifierBuilder {
    checker: Arc<dyn HostnameChecker>,
    fallback: Option<Box<dyn Verifier>>,
}

impl fmt::Debug for HostnameVerifierBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostnameVerifierBuilder")
            .field("checker", &"<Arc<dyn HostnameChecker>>")
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Default for HostnameVerifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostnameVerifierBuilder {
    /// Creates a builder with the default checker and no fallback.
    pub fn new() -> Self {
        Self {
            checker: Arc::new(X509Checker::new()),
            fallback: None,
        }
    }

    /// Sets the checker used to match certificates and principals.
    #[must_use]
    pub fn checker<C: HostnameChecker>(mut self, checker: C) -> Self {
        self.checker = Arc::new(checker);
        self
    }

    /// Sets the verifier consulted when this one finds no match.
    ///
    /// Its verdict becomes the overall verdict. Setting a fallback again
    /// replaces the previous one; longer chains are built by giving the
    /// fallback a fallback of its own.
    #[must_use]
    pub fn fallback<V: Verifier>(mut self, fallback: V) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Builds the verifier.
    pub fn build(self) -> HostnameVerifier {
        HostnameVerifier {
            checker: self.checker,
            fallback: self.fallback,
        }
    }
}

/// Lower-case hex rendering of a session id for diagnostics.
struct SessionId<'a>(&'a [u8]);

impl fmt::Display for SessionId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<none>");
        }
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}
