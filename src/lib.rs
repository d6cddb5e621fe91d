#![forbid(unsafe_code)]
//! mailposture_lib — audit SPF / DKIM / DMARC d'un domaine.
//!
//! Each protocol pipeline resolves the relevant DNS TXT records through the
//! [`TxtLookup`] port, validates them against the RFC grammar, and grades the
//! result. [`check_domain`] bundles the three pipelines into one report.

pub mod config;
pub mod dkim;
pub mod dmarc;
mod error;
mod resolver;
pub mod score;
pub mod spf;

pub use config::CheckOptions;
pub use dkim::{DkimOutcome, SelectorDiscovery};
pub use dmarc::DmarcOutcome;
pub use error::CheckError;
pub use resolver::{TxtLookup, system_resolver};
pub use score::{Grade, ScoreItem, ScoringResult};
pub use spf::SpfOutcome;

#[cfg(feature = "with-doh")]
pub use resolver::doh_resolver;

use resolver::normalize_domain;

/// Combined posture report over the three authentication mechanisms.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAuthReport {
    pub domain: String,
    pub spf: SpfOutcome,
    pub dkim: DkimOutcome,
    pub dmarc: DmarcOutcome,
}

/// Checks a domain with the system resolver and default options.
pub async fn check_domain(domain: &str) -> Result<DomainAuthReport, CheckError> {
    let resolver = system_resolver()?;
    let discovery = CheckOptions::default().selector_discovery();
    check_domain_with(&resolver, domain, &discovery).await
}

/// Checks a domain against a caller-supplied resolver and discovery
/// component (whose selector cache survives across calls).
///
/// The three pipelines run concurrently; any transport failure fails the
/// whole check rather than producing a partial report.
pub async fn check_domain_with<R: TxtLookup>(
    resolver: &R,
    domain: &str,
    discovery: &SelectorDiscovery,
) -> Result<DomainAuthReport, CheckError> {
    let ascii = normalize_domain(domain)?;
    let (spf, dkim, dmarc) = tokio::join!(
        spf::check(resolver, &ascii),
        dkim::check(resolver, &ascii, discovery),
        dmarc::check(resolver, &ascii),
    );
    Ok(DomainAuthReport {
        domain: ascii,
        spf: spf?,
        dkim: dkim?,
        dmarc: dmarc?,
    })
}
