use std::net::Ipv4Addr;

/// Outcome of validating one record string.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

const MECHANISMS: &[&str] = &["a", "mx", "ip4", "ip6", "include", "exists", "all"];
const MODIFIERS: &[&str] = &["redirect", "exp"];
const VALUE_REQUIRED_MECHANISMS: &[&str] = &["a", "mx", "include", "exists"];

/// Validates the mechanism/modifier grammar of exactly one SPF record.
///
/// A missing `v=spf1` version term is terminal; every other problem is
/// accumulated so a caller sees all of a record's issues at once.
pub fn validate_syntax(raw_record: &str) -> SyntaxReport {
    let mut errors = Vec::new();
    let terms: Vec<&str> = raw_record.split_whitespace().collect();

    if terms.first() != Some(&"v=spf1") {
        return SyntaxReport {
            is_valid: false,
            errors: vec!["Record must start with version term 'v=spf1'".to_string()],
        };
    }

    if let Some(last) = terms.last() {
        if terms.len() == 1 {
            errors.push("Record has no terms after the version".to_string());
        } else if !last.contains("all") && !last.starts_with("redirect=") {
            errors.push(format!(
                "Record should end with an 'all' mechanism or a 'redirect' modifier, found '{last}'"
            ));
        }
    }

    for term in terms.iter().skip(1) {
        validate_term(term, &mut errors);
    }

    SyntaxReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn validate_term(term: &str, errors: &mut Vec<String>) {
    let body = term.strip_prefix(['+', '-', '~', '?']).unwrap_or(term);
    if body.is_empty() {
        errors.push(format!("Empty term '{term}'"));
        return;
    }

    let (name, value) = match body.split_once([':', '=']) {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let delimiter = body.as_bytes().get(name.len()).copied();

    if MECHANISMS.contains(&name) {
        validate_mechanism(term, name, value, errors);
    } else if MODIFIERS.contains(&name) {
        // modifiers use '=' and always carry a value
        if delimiter != Some(b'=') || value.is_none_or(str::is_empty) {
            errors.push(format!("Modifier '{name}' requires a value in '{term}'"));
        }
    } else {
        errors.push(format!("Unknown mechanism or modifier '{name}' in '{term}'"));
    }
}

fn validate_mechanism(term: &str, name: &str, value: Option<&str>, errors: &mut Vec<String>) {
    match name {
        "ip4" => {
            if !value.is_some_and(is_valid_ip4_value) {
                errors.push(format!("Invalid IPv4 address in '{term}'"));
            }
        }
        "ip6" => {
            if !value.is_some_and(is_valid_ip6_value) {
                errors.push(format!("Invalid IPv6 address in '{term}'"));
            }
        }
        _ if VALUE_REQUIRED_MECHANISMS.contains(&name) => {
            if value.is_none_or(str::is_empty) {
                errors.push(format!("Mechanism '{name}' requires a value in '{term}'"));
            }
        }
        _ => {}
    }
}

fn is_valid_ip4_value(value: &str) -> bool {
    let (address, prefix) = match value.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (value, None),
    };
    if address.parse::<Ipv4Addr>().is_err() {
        return false;
    }
    match prefix {
        None => true,
        Some(prefix) => prefix.parse::<u8>().is_ok_and(|bits| bits <= 32),
    }
}

fn is_valid_ip6_value(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
}
