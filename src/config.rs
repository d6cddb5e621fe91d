use std::time::Duration;

use crate::dkim::SelectorDiscovery;

/// Selectors published by the large mail providers, probed when the caller
/// does not supply an explicit list.
pub(crate) const DEFAULT_DKIM_SELECTORS: &[&str] = &[
    "default",
    "google",
    "selector1",
    "selector2",
    "k1",
    "k2",
    "k3",
    "s1",
    "s2",
    "s3",
    "dkim",
    "mail",
    "email",
    "smtp",
    "mx",
    "key1",
    "key2",
    "sig1",
    "mandrill",
    "mailjet",
    "mailgun",
    "mg",
    "sendgrid",
    "smtpapi",
    "sparkpost",
    "amazonses",
    "ses",
    "pm",
    "zoho",
    "zmail",
    "fm1",
    "fm2",
    "fm3",
    "protonmail",
    "protonmail2",
    "protonmail3",
    "cm",
    "dk",
    "mesmtp",
    "krs",
];

const DEFAULT_SELECTOR_CACHE_TTL: Duration = Duration::from_millis(300_000);

/// Static configuration for a posture check: the DKIM candidate-selector
/// list and the discovery cache TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    dkim_selectors: Vec<String>,
    dkim_cache_ttl: Duration,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one candidate selector (normalized, duplicates ignored).
    pub fn with_dkim_selector(mut self, selector: impl Into<String>) -> Self {
        if let Some(normalized) = normalize_selector(selector.into()) {
            if !self.dkim_selectors.contains(&normalized) {
                self.dkim_selectors.push(normalized);
            }
        }
        self
    }

    pub fn with_dkim_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for selector in selectors {
            self = self.with_dkim_selector(selector);
        }
        self
    }

    /// Replaces the candidate list entirely (an empty list disables probing).
    pub fn dkim_selectors_only<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dkim_selectors.clear();
        self.with_dkim_selectors(selectors)
    }

    pub fn with_dkim_cache_ttl(mut self, ttl: Duration) -> Self {
        self.dkim_cache_ttl = ttl;
        self
    }

    pub fn dkim_selectors(&self) -> &[String] {
        &self.dkim_selectors
    }

    pub fn dkim_cache_ttl(&self) -> Duration {
        self.dkim_cache_ttl
    }

    /// Builds the discovery component this configuration describes.
    pub fn selector_discovery(&self) -> SelectorDiscovery {
        SelectorDiscovery::new(self.dkim_selectors.clone(), self.dkim_cache_ttl)
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            dkim_selectors: DEFAULT_DKIM_SELECTORS
                .iter()
                .map(|selector| (*selector).to_string())
                .collect(),
            dkim_cache_ttl: DEFAULT_SELECTOR_CACHE_TTL,
        }
    }
}

fn normalize_selector(input: String) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
