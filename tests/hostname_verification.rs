use hostname_verifier::{
    HostnameVerifier, KerberosPrincipal, PeerCertificate, Principal, Session, SessionSnapshot,
    Verifier,
};

fn leaf(der: &'static [u8]) -> SessionSnapshot {
    SessionSnapshot::new().with_certificates([PeerCertificate::x509(der)])
}

fn kerberos(name: &str) -> Principal {
    KerberosPrincipal::new(name).unwrap().into()
}

const DNS_SAN: &[u8] = include_bytes!("testdata/dns-san.der");
const WILDCARD_SAN: &[u8] = include_bytes!("testdata/wildcard-san.der");
const IP_SAN: &[u8] = include_bytes!("testdata/ip-san.der");
const DNS_ONLY_IP_LOOKALIKE: &[u8] = include_bytes!("testdata/dns-only-ip-lookalike.der");
const CN_ONLY: &[u8] = include_bytes!("testdata/cn-only.der");
const CORRUPTED: &[u8] = include_bytes!("testdata/corrupted");

#[test]
fn test_dns_san_equal_to_hostname_verifies() {
    let verifier = HostnameVerifier::new();
    let session = leaf(DNS_SAN);

    assert!(verifier.verify("host.example.com", &session));
    assert!(verifier.verify("HOST.example.COM", &session));
    // the SAN entry is Other.Example.org
    assert!(verifier.verify("other.example.org", &session));
    assert!(!verifier.verify("evil.example.com", &session));
}

#[test]
fn test_wildcard_san_matches_a_single_label() {
    let verifier = HostnameVerifier::new();
    let session = leaf(WILDCARD_SAN);

    assert!(verifier.verify("a.example.com", &session));
    assert!(!verifier.verify("example.com", &session));
    assert!(!verifier.verify("a.b.example.com", &session));
    // CN is wildcard.example.net, shadowed by the DNS SAN
    assert!(!verifier.verify("wildcard.example.net", &session));
}

#[test]
fn test_ip_literal_matches_only_ip_san() {
    let verifier = HostnameVerifier::new();

    assert!(verifier.verify("10.0.0.1", &leaf(IP_SAN)));
    assert!(verifier.verify("[::1]", &leaf(IP_SAN)));
    assert!(!verifier.verify("10.0.0.2", &leaf(IP_SAN)));
    assert!(verifier.verify("10.0.0.1.", &leaf(IP_SAN)));

    // DNS:*.0.0.1, DNS:10.0.0.1, CN=10.0.0.1 and no IP SAN
    assert!(!verifier.verify("10.0.0.1", &leaf(DNS_ONLY_IP_LOOKALIKE)));
    assert!(!verifier.verify("10.0.0.1.", &leaf(DNS_ONLY_IP_LOOKALIKE)));
    assert!(!verifier.verify("1.0.0.1.", &leaf(DNS_ONLY_IP_LOOKALIKE)));
}

#[test]
fn test_common_name_without_san() {
    let verifier = HostnameVerifier::new();

    assert!(verifier.verify("cn.example.com", &leaf(CN_ONLY)));
    assert!(!verifier.verify("example.com", &leaf(CN_ONLY)));
}

#[test]
fn test_corrupted_leaf_rejects() {
    assert!(!HostnameVerifier::new().verify("host.example.com", &leaf(CORRUPTED)));
}

#[test]
fn test_unverified_peer_with_kerberos_principal_verifies() {
    let session =
        SessionSnapshot::new().with_principal(kerberos("HTTP/host.example.com@EXAMPLE.COM"));

    let verifier = HostnameVerifier::new();
    assert!(verifier.verify("host.example.com", &session));
    assert!(!verifier.verify("other.example.com", &session));
}

#[test]
fn test_mismatched_certificate_is_not_rescued_by_principal() {
    let session = leaf(DNS_SAN).with_principal(kerberos("HTTP/evil.example.com@EXAMPLE.COM"));

    assert!(!HostnameVerifier::new().verify("evil.example.com", &session));
}

#[test]
fn test_empty_chain_is_not_rescued_by_principal() {
    let session = SessionSnapshot::new()
        .with_certificates([])
        .with_principal(kerberos("HTTP/host.example.com@EXAMPLE.COM"));

    assert!(!HostnameVerifier::new().verify("host.example.com", &session));
}

#[test]
fn test_fallback_only_consulted_after_primary_rejects() {
    let verifier = HostnameVerifier::builder()
        .fallback(|hostname: &str, _: &dyn Session| hostname == "legacy.example.com")
        .build();

    let session = leaf(DNS_SAN);
    assert!(verifier.verify("host.example.com", &session));
    assert!(verifier.verify("legacy.example.com", &session));
    assert!(!verifier.verify("evil.example.com", &session));
}

#[test]
fn test_fallback_chain_of_verifiers() {
    let wildcard = HostnameVerifier::new();
    let verifier = HostnameVerifier::builder()
        .fallback(move |hostname: &str, _: &dyn Session| {
            wildcard.verify(hostname, &leaf(WILDCARD_SAN))
        })
        .build();

    let session = leaf(DNS_SAN);
    assert!(verifier.verify("host.example.com", &session));
    assert!(verifier.verify("b.example.com", &session));
    assert!(!verifier.verify("example.com", &session));
}

#[test]
fn test_double_unverified_never_panics() {
    let verifier = HostnameVerifier::new();
    for hostname in ["", "host.example.com", "10.0.0.1", "[::1]", "*.example.com", "."] {
        assert!(!verifier.verify(hostname, &SessionSnapshot::new()));
    }
}
