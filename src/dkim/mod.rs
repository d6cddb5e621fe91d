mod discovery;
mod key;
mod parser;
mod score;
mod types;
mod validate;

pub use discovery::SelectorDiscovery;
pub use key::key_bits;
pub use parser::{DkimParseError, parse_tags};
pub use score::score;
pub use types::{
    DkimOutcome, DkimRecord, DkimRecordSet, DkimSelectorChecks, DkimSelectorValidation,
    DkimTags, DkimValidationResult,
};
pub use validate::validate;

use chrono::Utc;
use futures::future::join_all;
use tracing::debug;

use crate::error::CheckError;
use crate::resolver::{TxtLookup, fqdn};

/// Full DKIM pipeline for one (already normalized) domain: discover
/// selectors, fetch and parse their key records, validate, score.
pub async fn check<R: TxtLookup>(
    resolver: &R,
    domain: &str,
    discovery: &SelectorDiscovery,
) -> Result<DkimOutcome, CheckError> {
    let selectors = discovery.discover(resolver, domain).await;

    let fetches = selectors.iter().map(|selector| async move {
        let name = fqdn(&format!("{selector}._domainkey"), domain);
        match resolver.lookup_txt(&name).await {
            Ok(records) => (selector.clone(), records),
            Err(err) => {
                debug!(selector = %selector, error = %err, "selector record fetch failed");
                (selector.clone(), Vec::new())
            }
        }
    });

    let mut records = Vec::new();
    let mut issues = Vec::new();
    for (selector, answers) in join_all(fetches).await {
        for raw in answers {
            let raw = raw.trim().to_string();
            match parse_tags(&raw) {
                Ok(tags) => records.push(DkimRecord {
                    domain: domain.to_string(),
                    selector: selector.clone(),
                    raw_record: raw,
                    tags,
                    retrieved_at: Utc::now(),
                }),
                Err(err) => issues.push(format!("Selector '{selector}': {err}")),
            }
        }
    }

    let record_set = DkimRecordSet {
        domain: domain.to_string(),
        records,
        retrieved_at: Utc::now(),
    };
    let validation = validate(&record_set, issues);
    let scoring = score(&record_set);
    Ok(DkimOutcome {
        record_set,
        validation,
        scoring,
    })
}
