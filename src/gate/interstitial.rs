//! Interstitial page parameters and messages.
//!
//! The confirmation page receives the blocked navigation as URL query parameters
//! and answers with exactly one `InterstitialMessage`.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Parameters handed to the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterstitialParams {
    /// The blocked URL
    pub url: String,
    /// Display form of the domain (punycode decoded)
    pub domain: String,
    /// Domain key as used by the caches
    pub raw_domain: String,
    /// Whether the blocked navigation came from a private window
    pub is_incognito: bool,
}

impl InterstitialParams {
    /// Encodes the parameters as `url=..&domain=..&rawDomain=..&isIncognito=..`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("url", &self.url)
            .append_pair("domain", &self.domain)
            .append_pair("rawDomain", &self.raw_domain)
            .append_pair("isIncognito", if self.is_incognito { "true" } else { "false" })
            .finish()
    }

    /// Decodes parameters produced by `to_query_string()`.
    ///
    /// Returns `None` if `url`, `domain` or `rawDomain` is missing. `isIncognito`
    /// is only true for the literal value `"true"`.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut url = None;
        let mut domain = None;
        let mut raw_domain = None;
        let mut is_incognito = false;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "url" => url = Some(value.into_owned()),
                "domain" => domain = Some(value.into_owned()),
                "rawDomain" => raw_domain = Some(value.into_owned()),
                "isIncognito" => is_incognito = value == "true",
                _ => {}
            }
        }
        Some(Self {
            url: url?,
            domain: domain?,
            raw_domain: raw_domain?,
            is_incognito,
        })
    }
}

/// Builds the confirmation page URL for `params` on top of `base`.
pub fn interstitial_url(base: &str, params: &InterstitialParams) -> String {
    let query = params.to_query_string();
    match url::Url::parse(base) {
        Ok(mut page) => {
            page.set_query(Some(&query));
            page.into()
        }
        Err(_) => format!("{base}?{query}"),
    }
}

/// Answer sent back by the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum InterstitialMessage {
    /// The user chose to open the blocked site anyway.
    #[serde(rename_all = "camelCase")]
    OpenUrl {
        url: String,
        /// The raw domain key received in `InterstitialParams::raw_domain`
        domain: String,
        is_incognito: bool,
    },
    /// The user backed out and the page has no history to return to.
    CloseTab,
}

/// Result of handling an `InterstitialMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageResponse {
    /// The message was handled
    Success,
    /// The sender tab could not be identified
    Error,
}
