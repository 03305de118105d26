#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # hostname-verifier
//!
//! `hostname-verifier` checks, after a TLS handshake has completed, that the
//! identity the peer presented belongs to the host the caller meant to reach.
//! It is meant for transports that authenticate the certificate chain but do
//! not bind it to a hostname themselves.
//!
//! The identity is taken from the leaf X.509 certificate (Subject Alternative
//! Names, then Common Name). When the transport reports that the peer was not
//! authenticated with certificates at all, a Kerberos service principal
//! (`HTTP/host.example.com@REALM`) is matched instead. A verifier may chain
//! to one fallback verifier that is consulted when nothing matched.
//!
//! Verification always yields a `bool`: callers decide whether to abort their
//! own handshake.
//!
//! Certificate chain validation (trust anchors, expiry, revocation) is not
//! performed here.
//!
//! ## Example
//!
//! ```rust
//! use hostname_verifier::{HostnameVerifier, PeerCertificate, SessionSnapshot, Verifier};
//!
//! # fn leaf_der() -> Vec<u8> { Vec::new() }
//! let verifier = HostnameVerifier::new();
//!
//! let session = SessionSnapshot::new().with_certificates([PeerCertificate::x509(leaf_der())]);
//!
//! if !verifier.verify("host.example.com", &session) {
//!     // reject the connection
//! }
//! ```
//!
//! ## Feature flags
//!
//! * `rustls` (default): implements [`Session`] for `rustls` connections.
//! * `tracing`: emit diagnostics as `tracing` events.
//! * `logging`: emit diagnostics as `log` records (ignored if `tracing` is on).
//!
//! Diagnostics never influence a verdict.

mod checker;
mod error;
mod principal;
mod session;
mod verifier;

#[cfg(feature = "rustls")]
mod transport;

mod observability;
mod prelude;

// Public re-exports
pub use checker::{HostnameChecker, X509Checker};
pub use error::{CheckError, MismatchReason, PeerUnverified, PrincipalError, Result};
pub use principal::{KerberosPrincipal, Principal};
pub use rustls_pki_types::CertificateDer;
pub use session::{PeerCertificate, Session, SessionSnapshot};
pub use verifier::{HostnameVerifier, HostnameVerifierBuilder, Verifier};
