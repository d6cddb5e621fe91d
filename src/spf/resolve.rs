use std::collections::HashSet;

use futures::future::BoxFuture;
use tracing::debug;

use crate::error::CheckError;
use crate::resolver::TxtLookup;

use super::types::{SpfRecordKind, SpfRecordOccurrence};

/// Walks the include/redirect chain of `domain` into a flat occurrence list.
///
/// The visited-set is shared across the whole call tree, so a domain already
/// resolved anywhere in the chain (not just an ancestor) yields nothing on a
/// second visit. A transport failure aborts the entire resolution.
pub async fn resolve<R: TxtLookup>(
    resolver: &R,
    domain: &str,
) -> Result<Vec<SpfRecordOccurrence>, CheckError> {
    let mut visited = HashSet::new();
    let mut occurrences = Vec::new();
    resolve_into(
        resolver,
        domain.to_string(),
        SpfRecordKind::Initial,
        &mut visited,
        &mut occurrences,
    )
    .await?;
    Ok(occurrences)
}

fn resolve_into<'a, R: TxtLookup>(
    resolver: &'a R,
    domain: String,
    kind: SpfRecordKind,
    visited: &'a mut HashSet<String>,
    occurrences: &'a mut Vec<SpfRecordOccurrence>,
) -> BoxFuture<'a, Result<(), CheckError>> {
    Box::pin(async move {
        if !visited.insert(domain.to_ascii_lowercase()) {
            debug!(domain = %domain, "SPF chain revisits domain, truncating");
            return Ok(());
        }

        let answers = resolver.lookup_txt(&domain).await?;
        for raw in answers {
            let record = strip_quotes(raw.trim());
            if !record.starts_with("v=spf1") {
                continue;
            }
            occurrences.push(SpfRecordOccurrence {
                domain: domain.clone(),
                raw_record: record.to_string(),
                kind,
            });

            let (includes, redirect) = scan_targets(record);
            for include in includes {
                resolve_into(resolver, include, SpfRecordKind::Include, visited, occurrences)
                    .await?;
            }
            if let Some(target) = redirect {
                resolve_into(resolver, target, SpfRecordKind::Redirect, visited, occurrences)
                    .await?;
            }
        }
        Ok(())
    })
}

/// Extracts `include:` targets in textual order and the first meaningful
/// `redirect=` target.
fn scan_targets(record: &str) -> (Vec<String>, Option<String>) {
    let mut includes = Vec::new();
    let mut redirect = None;
    for term in record.split_whitespace().skip(1) {
        let body = term
            .strip_prefix(['+', '-', '~', '?'])
            .unwrap_or(term);
        if let Some(target) = body.strip_prefix("include:") {
            if !target.is_empty() {
                includes.push(target.to_string());
            }
        } else if redirect.is_none() {
            if let Some(target) = term.strip_prefix("redirect=") {
                if !target.is_empty() {
                    redirect = Some(target.to_string());
                }
            }
        }
    }
    (includes, redirect)
}

fn strip_quotes(record: &str) -> &str {
    record.trim_matches(['"', '\'']).trim()
}
