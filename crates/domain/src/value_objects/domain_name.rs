//! Registrable domain value object
//!
//! Reduces URLs, bare hosts and email-like strings to the registrable part of
//! the host, using the public suffix list.
//!
//! # Examples
//!
//! ```
//! use domain::Domain;
//!
//! let domain = Domain::parse("https://www.Example.com/about?x=1").unwrap();
//! assert_eq!(domain.as_str(), "example.com");
//!
//! let domain = Domain::parse("foo.bar.example.co.uk").unwrap();
//! assert_eq!(domain.as_str(), "example.co.uk");
//!
//! assert!(Domain::parse("not a host").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use url::{Host, Url};

use crate::errors::DomainError;

/// A normalized registrable domain such as `example.com`
///
/// Two domains are equal iff their normalized forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Normalize a raw URL, host or email-like string
    ///
    /// Scheme, credentials, port, subdomains, path, query and fragment are
    /// dropped. Normalizing an already normalized domain returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDomain`] when the input has no parseable
    /// host, the host is an IP address, or the host is only a public suffix.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim().to_lowercase();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidDomain(raw.to_string()));
        }

        let candidate = if has_scheme(&trimmed) {
            trimmed
        } else {
            format!("http://{trimmed}")
        };

        let url = Url::parse(&candidate)
            .map_err(|e| DomainError::InvalidDomain(format!("{raw}: {e}")))?;

        let host = match url.host() {
            Some(Host::Domain(host)) => host.trim_end_matches('.').to_string(),
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => {
                return Err(DomainError::InvalidDomain(format!(
                    "{raw}: IP addresses have no registrable domain"
                )));
            },
            None => return Err(DomainError::InvalidDomain(raw.to_string())),
        };

        psl::domain_str(&host)
            .map(|registrable| Self(registrable.to_string()))
            .ok_or_else(|| DomainError::InvalidDomain(format!("{raw}: no registrable domain")))
    }

    /// Get the domain as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value and return the inner string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Whether `input` starts with `scheme://`
fn has_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Domain {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Domain {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
