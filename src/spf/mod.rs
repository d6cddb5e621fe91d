mod resolve;
mod rules;
mod score;
mod syntax;
mod types;

pub use resolve::resolve;
pub use rules::validate;
pub use score::score;
pub use syntax::{SyntaxReport, validate_syntax};
pub use types::{
    SpfCheck, SpfCheckError, SpfOutcome, SpfQualifier, SpfRecordKind, SpfRecordOccurrence,
    SpfValidationReport,
};

use crate::error::CheckError;
use crate::resolver::TxtLookup;

/// Full SPF pipeline for one (already normalized) domain: resolve the chain,
/// validate it, score it.
pub async fn check<R: TxtLookup>(resolver: &R, domain: &str) -> Result<SpfOutcome, CheckError> {
    let occurrences = resolve(resolver, domain).await?;
    let report = validate(&occurrences);
    let scoring = score(&report);
    Ok(SpfOutcome {
        occurrences,
        report,
        scoring,
    })
}

#[cfg(test)]
mod tests;
