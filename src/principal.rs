//! Non-certificate peer identities.

use crate::error::{PrincipalError, Result};
use std::fmt;
use std::str::FromStr;

/// A peer identity obtained from an authentication mechanism other than X.509.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// A Kerberos service principal, e.g. `HTTP/host.example.com@EXAMPLE.COM`.
    Kerberos(KerberosPrincipal),
    /// Any other kind of principal, carried by name only.
    Other(String),
}

impl Principal {
    /// Returns the principal name as presented by the transport.
    pub fn name(&self) -> &str {
        match self {
            Self::Kerberos(p) => p.name(),
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<KerberosPrincipal> for Principal {
    fn from(principal: KerberosPrincipal) -> Self {
        Self::Kerberos(principal)
    }
}

/// A parsed Kerberos principal name of the form `component[/component...][@REALM]`.
///
/// A backslash escapes the character that follows it, so `/` and `@` may
/// appear inside components. For service principals the first component is
/// the service and the second one is the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KerberosPrincipal {
    name: String,
    components: Vec<String>,
    realm: Option<String>,
}

impl KerberosPrincipal {
    /// Parses a Kerberos principal name.
    ///
    /// # Errors
    ///
    /// Returns a [`PrincipalError`] if the name is empty, has an empty
    /// component or realm, or ends with a dangling `\`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hostname_verifier::KerberosPrincipal;
    ///
    /// let principal = KerberosPrincipal::new("HTTP/host.example.com@EXAMPLE.COM")?;
    /// assert_eq!(principal.service(), "HTTP");
    /// assert_eq!(principal.hostname(), Some("host.example.com"));
    /// assert_eq!(principal.realm(), Some("EXAMPLE.COM"));
    /// # Ok::<(), hostname_verifier::PrincipalError>(())
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(PrincipalError::Empty);
        }

        let mut components = Vec::new();
        let mut realm = None;
        let mut current = String::new();
        let mut chars = name.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => current.push(chars.next().ok_or(PrincipalError::TrailingEscape)?),
                '/' if realm.is_none() => {
                    components.push(take_component(&mut current)?);
                }
                '@' if realm.is_none() => {
                    components.push(take_component(&mut current)?);
                    realm = Some(String::new());
                }
                c => current.push(c),
            }
        }

        match realm {
            Some(_) if current.is_empty() => return Err(PrincipalError::EmptyRealm),
            Some(_) => realm = Some(current),
            None => components.push(take_component(&mut current)?),
        }

        Ok(Self {
            name: name.to_owned(),
            components,
            realm,
        })
    }

    /// Returns the principal name exactly as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unescaped name components, in order.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Returns the first name component (the service for service principals).
    pub fn service(&self) -> &str {
        // parsing guarantees at least one component
        self.components.first().map_or("", String::as_str)
    }

    /// Returns the host component of a service principal.
    ///
    /// `None` if the principal has a single component (a user principal).
    pub fn hostname(&self) -> Option<&str> {
        self.components.get(1).map(String::as_str)
    }

    /// Returns the realm, if the name carried one.
    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }
}

fn take_component(current: &mut String) -> Result<String> {
    if current.is_empty() {
        return Err(PrincipalError::EmptyComponent);
    }
    Ok(std::mem::take(current))
}

impl fmt::Display for KerberosPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for KerberosPrincipal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for KerberosPrincipal {
    type Error = PrincipalError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_principal() {
        let p = KerberosPrincipal::new("HTTP/host.example.com@EXAMPLE.COM").unwrap();
        assert_eq!(p.components(), ["HTTP", "host.example.com"]);
        assert_eq!(p.service(), "HTTP");
        assert_eq!(p.hostname(), Some("host.example.com"));
        assert_eq!(p.realm(), Some("EXAMPLE.COM"));
        assert_eq!(p.to_string(), "HTTP/host.example.com@EXAMPLE.COM");
    }

    #[test]
    fn test_parse_user_principal_has_no_hostname() {
        let p = KerberosPrincipal::new("alice@EXAMPLE.COM").unwrap();
        assert_eq!(p.service(), "alice");
        assert_eq!(p.hostname(), None);
    }

    #[test]
    fn test_parse_without_realm() {
        let p: KerberosPrincipal = "host/db.example.com".parse().unwrap();
        assert_eq!(p.hostname(), Some("db.example.com"));
        assert_eq!(p.realm(), None);
    }

    #[test]
    fn test_parse_escaped_separators() {
        let p = KerberosPrincipal::new(r"svc\/a/host\@x@REALM").unwrap();
        assert_eq!(p.components(), ["svc/a", "host@x"]);
        assert_eq!(p.realm(), Some("REALM"));
    }

    #[test]
    fn test_realm_keeps_later_separators() {
        let p = KerberosPrincipal::new("HTTP/host@EXAMPLE/COM@X").unwrap();
        assert_eq!(p.hostname(), Some("host"));
        assert_eq!(p.realm(), Some("EXAMPLE/COM@X"));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(KerberosPrincipal::new(""), Err(PrincipalError::Empty));
        assert_eq!(
            KerberosPrincipal::new("HTTP//host@REALM"),
            Err(PrincipalError::EmptyComponent)
        );
        assert_eq!(
            KerberosPrincipal::new("@REALM"),
            Err(PrincipalError::EmptyComponent)
        );
        assert_eq!(
            KerberosPrincipal::new("HTTP/host@"),
            Err(PrincipalError::EmptyRealm)
        );
        assert_eq!(
            KerberosPrincipal::new("HTTP/host\\"),
            Err(PrincipalError::TrailingEscape)
        );
    }

    #[test]
    fn test_principal_name_and_conversion() {
        let kerberos = KerberosPrincipal::try_from("HTTP/h@R").unwrap();
        let principal = Principal::from(kerberos);
        assert_eq!(principal.name(), "HTTP/h@R");

        let other = Principal::Other("CN=client".to_owned());
        assert_eq!(other.to_string(), "CN=client");
    }
}
