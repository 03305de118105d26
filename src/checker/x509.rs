//! X.509 hostname matching backed by `x509-parser`.

use super::HostnameChecker;
use crate::error::{CheckError, MismatchReason};
use rustls_pki_types::CertificateDer;
use std::net::IpAddr;
use x509_parser::certificate::X509Certificate;
use x509_parser::error::X509Error;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::nom::Err;
use x509_parser::oid_registry;

/// Matches hostnames against the Subject Alternative Name and Common Name of
/// an X.509 leaf certificate.
///
/// * An IP literal (`10.0.0.1`, `::1`, `[::1]`) is compared as an address
///   against IP-address SAN entries only.
/// * Any other hostname is compared against DNS-name SAN entries. The subject
///   CN is consulted only when the certificate has no DNS-name SAN entries at
///   all; if several CNs are present the last (most specific) one is used.
/// * A DNS pattern may carry one wildcard, as the whole leftmost label, and it
///   stands for exactly one label: `*.example.com` matches `a.example.com` but
///   not `example.com` or `a.b.example.com`.
///
/// Comparison ignores ASCII case and a single trailing dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Checker;

impl X509Checker {
    /// Creates a new checker.
    pub fn new() -> Self {
        Self
    }
}

impl HostnameChecker for X509Checker {
    fn match_certificate(
        &self,
        hostname: &str,
        certificate: &CertificateDer<'_>,
    ) -> Result<(), CheckError> {
        let cert = parse_certificate(certificate.as_ref())?;
        let san = SubjectAltNames::from_certificate(&cert)?;

        match Host::classify(hostname) {
            Host::Ip(ip) => match_ip_address(hostname, ip, &san),
            Host::Dns(name) => match_dns_name(hostname, name, &san, &cert),
        }
    }
}

enum Host<'a> {
    Ip(IpAddr),
    Dns(&'a str),
}

impl<'a> Host<'a> {
    fn classify(hostname: &'a str) -> Self {
        let bare = hostname.strip_suffix('.').unwrap_or(hostname);
        let bare = bare
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(bare);

        match bare.parse::<IpAddr>() {
            Ok(ip) => Self::Ip(ip.to_canonical()),
            Err(_) => Self::Dns(hostname),
        }
    }
}

/// The SAN entries relevant to hostname matching.
#[derive(Debug, Default)]
struct SubjectAltNames<'a> {
    present: bool,
    dns_names: Vec<&'a str>,
    ip_addresses: Vec<IpAddr>,
}

impl<'a> SubjectAltNames<'a> {
    fn from_certificate(cert: &'a X509Certificate<'_>) -> Result<Self, CheckError> {
        let ext = cert
            .tbs_certificate
            .get_extension_unique(&oid_registry::OID_X509_EXT_SUBJECT_ALT_NAME)
            .map_err(malformed)?;

        let Some(ext) = ext else {
            return Ok(Self::default());
        };

        let san = match ext.parsed_extension() {
            ParsedExtension::SubjectAlternativeName(san) => san,
            other => {
                return Err(CheckError::MalformedCertificate(format!(
                    "unexpected subject alternative name extension: {other:?}"
                )))
            }
        };

        let mut names = Self {
            present: true,
            ..Self::default()
        };

        for name in &san.general_names {
            match name {
                GeneralName::DNSName(dns) => names.dns_names.push(*dns),
                GeneralName::IPAddress(bytes) => {
                    // entries that are neither 4 nor 16 bytes are not addresses
                    if let Some(ip) = ip_from_octets(bytes) {
                        names.ip_addresses.push(ip);
                    }
                }
                _ => {}
            }
        }

        Ok(names)
    }
}

fn parse_certificate(der: &[u8]) -> Result<X509Certificate<'_>, CheckError> {
    match x509_parser::parse_x509_certificate(der) {
        Ok((_, cert)) => Ok(cert),
        Err(Err::Incomplete(_)) => Err(malformed(X509Error::InvalidCertificate)),
        Err(Err::Error(e) | Err::Failure(e)) => Err(malformed(e)),
    }
}

fn malformed(e: X509Error) -> CheckError {
    CheckError::MalformedCertificate(e.to_string())
}

fn ip_from_octets(bytes: &[u8]) -> Option<IpAddr> {
    let ip = match bytes.len() {
        4 => IpAddr::from(<[u8; 4]>::try_from(bytes).ok()?),
        16 => IpAddr::from(<[u8; 16]>::try_from(bytes).ok()?),
        _ => return None,
    };
    Some(ip.to_canonical())
}

fn match_ip_address(
    hostname: &str,
    ip: IpAddr,
    san: &SubjectAltNames<'_>,
) -> Result<(), CheckError> {
    if !san.present {
        return Err(CheckError::mismatch(hostname, MismatchReason::NoSubjectAltNames));
    }

    if san.ip_addresses.contains(&ip) {
        Ok(())
    } else {
        Err(CheckError::mismatch(hostname, MismatchReason::NoMatchingIpAddress))
    }
}

fn match_dns_name(
    hostname: &str,
    name: &str,
    san: &SubjectAltNames<'_>,
    cert: &X509Certificate<'_>,
) -> Result<(), CheckError> {
    if !san.dns_names.is_empty() {
        return if san.dns_names.iter().any(|pattern| dns_name_matches(pattern, name)) {
            Ok(())
        } else {
            Err(CheckError::mismatch(hostname, MismatchReason::NoMatchingDnsName))
        };
    }

    let common_name = cert
        .subject()
        .iter_common_name()
        .last()
        .and_then(|attr| attr.as_str().ok());

    match common_name {
        None => Err(CheckError::mismatch(hostname, MismatchReason::NoCommonName)),
        Some(cn) if dns_name_matches(cn, name) => Ok(()),
        Some(_) => Err(CheckError::mismatch(hostname, MismatchReason::NoMatchingCommonName)),
    }
}

/// Matches a presented DNS identifier (possibly a wildcard pattern) against a
/// reference hostname.
fn dns_name_matches(pattern: &str, hostname: &str) -> bool {
    let pattern = pattern.strip_suffix('.').unwrap_or(pattern);
    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);

    if pattern.is_empty() || hostname.is_empty() || hostname.contains('*') {
        return false;
    }

    let Some(suffix) = pattern.strip_prefix("*.") else {
        return !pattern.contains('*') && pattern.eq_ignore_ascii_case(hostname);
    };

    // the wildcard must be followed by at least two non-empty labels
    let mut labels = suffix.split('.');
    if suffix.contains('*') || labels.clone().count() < 2 || labels.any(str::is_empty) {
        return false;
    }

    match hostname.split_once('.') {
        Some((label, rest)) => !label.is_empty() && rest.eq_ignore_ascii_case(suffix),
        None => false,
    }
}
