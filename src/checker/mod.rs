//! Identity matching between a hostname and peer identity material.

mod x509;

pub use x509::X509Checker;

use crate::error::{CheckError, MismatchReason};
use crate::principal::Principal;
use rustls_pki_types::CertificateDer;
use std::sync::Arc;

/// Matches a hostname against the identity a peer presented.
///
/// Both operations must be pure functions of their inputs. A match is `Ok(())`;
/// anything else is an error, never a sentinel value. Implementations must be
/// thread-safe.
pub trait HostnameChecker: Send + Sync + 'static {
    /// Succeeds iff `hostname` matches an identity claim in the leaf `certificate`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Mismatch`] when no identity claim matches, and
    /// [`CheckError::MalformedCertificate`] when the certificate is unreadable.
    fn match_certificate(
        &self,
        hostname: &str,
        certificate: &CertificateDer<'_>,
    ) -> Result<(), CheckError>;

    /// Succeeds iff `principal` is a Kerberos principal whose host component
    /// equals `hostname`, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::UnsupportedPrincipal`] for non-Kerberos principals
    /// and [`CheckError::Mismatch`] when the host component differs or is absent.
    fn match_principal(&self, hostname: &str, principal: &Principal) -> Result<(), CheckError> {
        match principal {
            Principal::Kerberos(kerberos) => match kerberos.hostname() {
                Some(host) if host.eq_ignore_ascii_case(hostname) => Ok(()),
                _ => Err(CheckError::mismatch(hostname, MismatchReason::PrincipalHostname)),
            },
            Principal::Other(name) => Err(CheckError::UnsupportedPrincipal(name.clone())),
        }
    }
}

impl HostnameChecker for Arc<dyn HostnameChecker> {
    fn match_certificate(
        &self,
        hostname: &str,
        certificate: &CertificateDer<'_>,
    ) -> Result<(), CheckError> {
        (**self).match_certificate(hostname, certificate)
    }

    fn match_principal(&self, hostname: &str, principal: &Principal) -> Result<(), CheckError> {
        (**self).match_principal(hostname, principal)
    }
}

impl HostnameChecker for Box<dyn HostnameChecker> {
    fn match_certificate(
        &self,
        hostname: &str,
        certificate: &CertificateDer<'_>,
    ) -> Result<(), CheckError> {
        (**self).match_certificate(hostname, certificate)
    }

    fn match_principal(&self, hostname: &str, principal: &Principal) -> Result<(), CheckError> {
        (**self).match_principal(hostname, principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::KerberosPrincipal;

    struct NeverMatches;

    impl HostnameChecker for NeverMatches {
        fn match_certificate(
            &self,
            hostname: &str,
            _certificate: &CertificateDer<'_>,
        ) -> Result<(), CheckError> {
            Err(CheckError::mismatch(hostname, MismatchReason::NoMatchingDnsName))
        }
    }

    fn kerberos(name: &str) -> Principal {
        KerberosPrincipal::new(name).unwrap().into()
    }

    #[test]
    fn test_kerberos_principal_matches_case_insensitive() {
        let checker = NeverMatches;
        assert_eq!(
            checker.match_principal("host.example.com", &kerberos("HTTP/Host.Example.COM@REALM")),
            Ok(())
        );
    }

    #[test]
    fn test_kerberos_principal_other_host_is_mismatch() {
        let err = NeverMatches
            .match_principal("host.example.com", &kerberos("HTTP/other.example.com@REALM"))
            .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_kerberos_user_principal_is_mismatch() {
        let err = NeverMatches
            .match_principal("alice", &kerberos("alice@REALM"))
            .unwrap_err();
        assert_eq!(
            err,
            CheckError::Mismatch {
                hostname: "alice".to_owned(),
                reason: MismatchReason::PrincipalHostname,
            }
        );
    }

    #[test]
    fn test_other_principal_is_unsupported() {
        let err = NeverMatches
            .match_principal("host.example.com", &Principal::Other("CN=host.example.com".into()))
            .unwrap_err();
        assert_eq!(err, CheckError::UnsupportedPrincipal("CN=host.example.com".into()));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_dyn_wrappers_delegate() {
        let arc: Arc<dyn HostnameChecker> = Arc::new(NeverMatches);
        let boxed: Box<dyn HostnameChecker> = Box::new(NeverMatches);
        let cert = CertificateDer::from(&[0u8][..]);

        assert!(arc.match_certificate("a", &cert).is_err());
        assert!(boxed.match_certificate("a", &cert).is_err());
        assert_eq!(arc.match_principal("h", &kerberos("HTTP/h@R")), Ok(()));
    }
}
