use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup as TxtAnswer,
};

use crate::error::CheckError;

pub(crate) fn normalize_domain(domain: &str) -> Result<String, CheckError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(CheckError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(CheckError::idna)
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

/// TXT lookup port consumed by every pipeline.
///
/// An empty `Vec` means "no records published"; transport and timeout
/// failures surface as [`CheckError::TxtLookup`] carrying the queried name.
/// Provider selection, retries and timeouts belong to the implementation.
#[async_trait]
pub trait TxtLookup: Send + Sync {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, CheckError>;
}

#[async_trait]
impl TxtLookup for TokioAsyncResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, CheckError> {
        let lookup = match TokioAsyncResolver::txt_lookup(self, name).await {
            Ok(lookup) => lookup,
            Err(err) => {
                if should_treat_as_empty(&err) {
                    return Ok(Vec::new());
                }
                return Err(CheckError::txt_lookup(name, err));
            }
        };
        collect_txt_records(name, &lookup)
    }
}

/// Resolver backed by the system configuration (`/etc/resolv.conf`).
pub fn system_resolver() -> Result<TokioAsyncResolver, CheckError> {
    TokioAsyncResolver::tokio_from_system_conf().map_err(CheckError::resolver_init)
}

/// Resolver speaking DNS-over-HTTPS against Cloudflare's public endpoint.
#[cfg(feature = "with-doh")]
pub fn doh_resolver() -> TokioAsyncResolver {
    use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
    TokioAsyncResolver::tokio(ResolverConfig::cloudflare_https(), ResolverOpts::default())
}

fn collect_txt_records(name: &str, lookup: &TxtAnswer) -> Result<Vec<String>, CheckError> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            let segment = std::str::from_utf8(piece.as_ref())
                .map_err(|err| CheckError::txt_data_utf8(name, err))?;
            record.push_str(segment);
        }
        records.push(record);
    }
    Ok(records)
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use trust_dns_resolver::error::ResolveErrorKind;

    use crate::error::CheckError;

    use super::TxtLookup;

    /// In-memory resolver for tests: fixed answers per name, optional
    /// injected transport failures, and a log of queried names.
    pub(crate) struct StubResolver {
        records: HashMap<String, Vec<String>>,
        failures: HashSet<String>,
        queries: Mutex<Vec<String>>,
    }

    impl StubResolver {
        pub(crate) fn new() -> Self {
            Self {
                records: HashMap::new(),
                failures: HashSet::new(),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn insert_records<I, S>(&mut self, name: &str, records: I)
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let values = records.into_iter().map(Into::into).collect();
            self.records.insert(normalize_name(name), values);
        }

        pub(crate) fn fail_lookup(&mut self, name: &str) {
            self.failures.insert(normalize_name(name));
        }

        pub(crate) fn query_count(&self) -> usize {
            self.queries.lock().expect("query log lock").len()
        }
    }

    #[async_trait]
    impl TxtLookup for StubResolver {
        async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, CheckError> {
            let key = normalize_name(name);
            self.queries.lock().expect("query log lock").push(key.clone());
            if self.failures.contains(&key) {
                return Err(CheckError::txt_lookup(
                    name,
                    ResolveErrorKind::Message("stub transport failure").into(),
                ));
            }
            Ok(self.records.get(&key).cloned().unwrap_or_default())
        }
    }

    fn normalize_name(name: &str) -> String {
        name.trim().trim_end_matches('.').to_ascii_lowercase()
    }
}
