//! Error types for identity matching and principal parsing.
//!
//! None of these errors escape [`Verifier::verify`](crate::Verifier::verify);
//! they exist so that checkers and transports can signal distinguishable
//! failure modes to the verifier.

use std::fmt;

/// Result type used by fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, PrincipalError>;

/// The transport could not provide a verified peer identity of the requested kind.
///
/// Returned by [`Session::peer_certificates`](crate::Session::peer_certificates)
/// when the handshake did not authenticate the peer with certificates, and by
/// [`Session::peer_principal`](crate::Session::peer_principal) when no principal
/// is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("peer not verified")]
pub struct PeerUnverified;

/// An error signalled by a [`HostnameChecker`](crate::HostnameChecker).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CheckError {
    /// Identity material was present but does not match the hostname.
    #[error("{reason} for {hostname}")]
    Mismatch {
        /// The hostname the caller intended to reach.
        hostname: String,
        /// What the checker looked at before giving up.
        reason: MismatchReason,
    },

    /// The principal is not of a kind the checker can match.
    #[error("unsupported principal: {0}")]
    UnsupportedPrincipal(String),

    /// The leaf certificate could not be parsed as X.509.
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),
}

impl CheckError {
    pub(crate) fn mismatch(hostname: &str, reason: MismatchReason) -> Self {
        Self::Mismatch {
            hostname: hostname.to_owned(),
            reason,
        }
    }

    /// Returns `true` if identity material was present but did not match.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

/// Why a [`CheckError::Mismatch`] was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MismatchReason {
    /// The hostname is an IP literal and the certificate has no SAN extension.
    NoSubjectAltNames,
    /// The hostname is an IP literal and no IP-address SAN entry equals it.
    NoMatchingIpAddress,
    /// DNS-name SAN entries exist but none matches the hostname.
    NoMatchingDnsName,
    /// No DNS-name SAN entries exist and the certificate has no common name.
    NoCommonName,
    /// No DNS-name SAN entries exist and the common name does not match.
    NoMatchingCommonName,
    /// The principal carries no hostname component, or a different one.
    PrincipalHostname,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoSubjectAltNames => "no subject alternative names present",
            Self::NoMatchingIpAddress => "no subject alternative name matches the IP address",
            Self::NoMatchingDnsName => "no subject alternative DNS name matches",
            Self::NoCommonName => "no subject alternative DNS names and no common name",
            Self::NoMatchingCommonName => "common name does not match",
            Self::PrincipalHostname => "principal hostname component does not match",
        };
        f.write_str(msg)
    }
}

/// An error that may arise parsing a Kerberos principal name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PrincipalError {
    /// The principal name is empty.
    #[error("principal name is empty")]
    Empty,

    /// A name component between separators is empty.
    #[error("principal name has an empty component")]
    EmptyComponent,

    /// The realm after `@` is empty.
    #[error("principal realm is empty")]
    EmptyRealm,

    /// The name ends with an unfinished `\` escape.
    #[error("principal name ends with a dangling escape")]
    TrailingEscape,
}
