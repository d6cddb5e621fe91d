mod parser;
mod score;
mod types;
mod validate;

pub use parser::parse_tags;
pub use score::score;
pub use types::{
    DmarcIssue, DmarcOutcome, DmarcRecord, DmarcSeverity, DmarcTags, DmarcValidationResult,
};
pub use validate::validate;

use chrono::Utc;

use crate::error::CheckError;
use crate::resolver::{TxtLookup, fqdn};

/// Full DMARC pipeline for one (already normalized) domain: fetch
/// `_dmarc.<domain>`, parse the first DMARC-looking record, validate, score.
pub async fn check<R: TxtLookup>(resolver: &R, domain: &str) -> Result<DmarcOutcome, CheckError> {
    let name = fqdn("_dmarc", domain);
    let answers = resolver.lookup_txt(&name).await?;

    let record = answers
        .iter()
        .map(|raw| raw.trim().trim_matches(['"', '\'']).trim())
        .find(|raw| starts_with_ignore_ascii_case(raw, "v=dmarc1"))
        .map(|raw| DmarcRecord {
            domain: domain.to_string(),
            raw_record: raw.to_string(),
            tags: parse_tags(raw),
            retrieved_at: Utc::now(),
        });

    let validation = validate(record.as_ref());
    let scoring = score(record.as_ref());
    Ok(DmarcOutcome {
        record,
        validation,
        scoring,
    })
}

fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}
