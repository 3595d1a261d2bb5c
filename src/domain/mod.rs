//! Domain canonicalization.
//!
//! This module derives the comparable keys used by the classifier from arbitrary
//! URLs:
//! - `parse_domain()` - Registrable domain (eTLD+1) or IP literal of a URL
//! - `parse_origin()` - Scheme, host and port of a URL
//! - `to_display_domain()` - Punycode-decoded form of a domain key, for display only
//!
//! Parsing never fails outright. When a URL cannot be canonicalized the raw input
//! is kept as a `CanonicalKey::Fallback`, which can only ever match itself and so
//! leans towards "unknown site".

use std::fmt;

use log::{error, warn};
use url::{Host, Url};

use crate::config::SUPPORTED_SCHEMES;
use crate::error_handling::DomainError;

/// A canonicalization result.
///
/// Both variants are compared as plain strings by the caches and the matcher;
/// the distinction tells callers whether the key is trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    /// Derived from a well-formed URL.
    Canonical(String),
    /// The raw input, kept because canonicalization failed.
    Fallback(String),
}

/// Registrable domain, IP literal, or raw URL of a navigation target.
pub type DomainKey = CanonicalKey;

/// Serialized origin (`scheme://host[:port]`) or raw URL.
pub type OriginKey = CanonicalKey;

impl CanonicalKey {
    /// The key as used in the caches.
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalKey::Canonical(key) | CanonicalKey::Fallback(key) => key,
        }
    }

    /// Consumes the key, returning its string.
    pub fn into_string(self) -> String {
        match self {
            CanonicalKey::Canonical(key) | CanonicalKey::Fallback(key) => key,
        }
    }

    /// Returns `true` for a key that embeds the raw URL.
    pub fn is_fallback(&self) -> bool {
        matches!(self, CanonicalKey::Fallback(_))
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `parse_domain()` treats URLs whose scheme is not http or https.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedProtocol {
    /// Keep the raw URL as the key.
    Fail,
    /// Return `None`; also applies to unparseable URLs.
    Ignore,
}

/// Source of registrable-domain answers.
pub trait SuffixList: Send + Sync {
    /// Returns the registrable domain (public suffix plus one label) of `host`,
    /// or `None` if `host` has no registrable part.
    fn registrable_domain(&self, host: &str) -> Option<String>;
}

/// The compiled-in Public Suffix List.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixList;

impl SuffixList for PublicSuffixList {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        psl::domain_str(host).map(str::to_string)
    }
}

/// Derives the domain key of a URL.
///
/// # Arguments
///
/// * `list` - Public suffix source
/// * `url` - The URL to canonicalize
/// * `unsupported` - Whether unparseable or non-http(s) URLs yield the raw URL or `None`
///
/// # Returns
///
/// - The host verbatim for IPv4 and bracketed IPv6 literals
/// - The registrable domain (e.g. "example.co.uk" from "https://www.example.co.uk/")
/// - The full hostname if no suffix matches or the suffix answer is inconsistent
/// - `CanonicalKey::Fallback(url)` when the URL cannot be canonicalized
pub fn parse_domain(
    list: &dyn SuffixList,
    url: &str,
    unsupported: UnsupportedProtocol,
) -> Option<DomainKey> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            return match unsupported {
                UnsupportedProtocol::Ignore => {
                    debug_sensitive!("Ignoring unparseable URL {url}: {e}");
                    None
                }
                UnsupportedProtocol::Fail => {
                    error!("Failed parsing URL {url}: {e}");
                    Some(CanonicalKey::Fallback(url.to_string()))
                }
            };
        }
    };

    let scheme = parsed.scheme();
    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return match unsupported {
            UnsupportedProtocol::Ignore => {
                debug_sensitive!("URL has unsupported protocol '{scheme}': {url}");
                None
            }
            UnsupportedProtocol::Fail => {
                // Callers expecting other schemes should have passed `Ignore`
                error!("URL has unsupported protocol '{scheme}': {url}");
                Some(CanonicalKey::Fallback(url.to_string()))
            }
        };
    }

    let hostname = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => {
            error!("URL {url} has no hostname");
            return Some(CanonicalKey::Fallback(url.to_string()));
        }
    };

    // Public suffix rules do not apply to address literals
    if matches!(parsed.host(), Some(Host::Ipv4(_) | Host::Ipv6(_))) {
        debug_sensitive!("Detected hostname {hostname} to be an IP address");
        return Some(CanonicalKey::Canonical(hostname.to_string()));
    }

    let key = match list.registrable_domain(hostname) {
        None => hostname.to_string(),
        Some(domain) if is_domain_suffix(hostname, &domain) => domain,
        Some(domain) => {
            warn!("PSL domain {domain} does not match hostname {hostname}");
            hostname.to_string()
        }
    };
    Some(CanonicalKey::Canonical(key))
}

/// True if `domain` equals `hostname` or is a dot-separated suffix of it.
fn is_domain_suffix(hostname: &str, domain: &str) -> bool {
    if hostname == domain {
        return true;
    }
    hostname
        .strip_suffix(domain)
        .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Derives the origin key of a URL.
///
/// Falls back to the raw URL when it cannot be parsed or its origin is opaque
/// (serialized as `"null"`).
pub fn parse_origin(url: &str) -> OriginKey {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Failed parsing URL {url}: {e}");
            return CanonicalKey::Fallback(url.to_string());
        }
    };

    let origin = parsed.origin().ascii_serialization();
    if origin.is_empty() || origin == "null" {
        error!("URL {url} has no origin");
        return CanonicalKey::Fallback(url.to_string());
    }
    CanonicalKey::Canonical(origin)
}

/// Converts a domain key to its human-readable form by decoding every
/// `xn--` label.
///
/// # Errors
///
/// Returns `DomainError::PunycodeDecode` if any `xn--` label is not valid
/// punycode. The key must then neither be displayed nor classified.
pub fn to_display_domain(domain: &str) -> Result<String, DomainError> {
    let labels = domain
        .split('.')
        .map(|label| match label.strip_prefix("xn--") {
            Some(encoded) => {
                idna::punycode::decode_to_string(encoded).ok_or_else(|| {
                    DomainError::PunycodeDecode {
                        domain: domain.to_string(),
                    }
                })
            }
            None => Ok(label.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labels.join("."))
}
