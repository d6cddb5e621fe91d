use super::types::DmarcTags;

/// Parses one DMARC record's `;`-delimited tag=value list.
///
/// Tag names match case-insensitively; policy and alignment values are
/// lowercased, numeric tags parse leniently (a malformed number reads as
/// absent), address lists drop their `mailto:` prefixes. Unknown tags are
/// ignored.
pub fn parse_tags(raw_record: &str) -> DmarcTags {
    let mut tags = DmarcTags::default();

    for segment in raw_record.split(';') {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (name, value) = match trimmed.split_once('=') {
            Some((name, value)) => (name.trim().to_ascii_lowercase(), value.trim()),
            None => continue,
        };
        match name.as_str() {
            "v" => tags.version = Some(value.to_string()),
            "p" => tags.policy = Some(value.to_ascii_lowercase()),
            "sp" => tags.subdomain_policy = Some(value.to_ascii_lowercase()),
            "pct" => tags.percentage = value.parse().ok(),
            "rf" => tags.report_format = Some(split_list(value, ':')),
            "ri" => tags.report_interval = value.parse().ok(),
            "rua" => tags.report_emails = Some(split_addresses(value)),
            "ruf" => tags.forensic_emails = Some(split_addresses(value)),
            "fo" => tags.failure_options = Some(split_list(value, ':')),
            "aspf" => tags.alignment_spf = Some(value.to_ascii_lowercase()),
            "adkim" => tags.alignment_dkim = Some(value.to_ascii_lowercase()),
            _ => {}
        }
    }

    tags
}

fn split_list(value: &str, delimiter: char) -> Vec<String> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_addresses(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.strip_prefix("mailto:").unwrap_or(part).to_string())
        .collect()
}
