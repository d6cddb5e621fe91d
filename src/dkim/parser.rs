use thiserror::Error;

use super::types::DkimTags;

/// Hard parse failure: RFC 6376 §3.6.1 invalidates a record whose `v=` tag
/// is not the first tag.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DkimParseError {
    #[error("the 'v=' tag must be the first tag of a DKIM record")]
    VersionNotFirst,
}

/// Parses one key record's tag=value list.
///
/// Segments split on `;` outside quoted spans; duplicate tags keep the last
/// value; unknown tags are ignored for forward compatibility.
pub fn parse_tags(raw_record: &str) -> Result<DkimTags, DkimParseError> {
    let mut tags = DkimTags::default();

    for (index, segment) in split_segments(raw_record).iter().enumerate() {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("v=") && index != 0 {
            return Err(DkimParseError::VersionNotFirst);
        }

        let (name, value) = match trimmed.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => continue,
        };
        match name {
            "v" => tags.version = Some(value.to_string()),
            "a" => tags.algorithm = Some(value.to_string()),
            "k" => tags.key_type = Some(value.to_string()),
            "p" => tags.public_key = Some(value.to_string()),
            "s" => tags.service_type = Some(value.to_string()),
            "t" => {
                tags.flags = value
                    .split(':')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "n" => tags.notes = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(tags)
}

/// Splits on `;`, honoring single- and double-quoted spans. Empty segments
/// are dropped so the v-first rule sees only meaningful segments.
fn split_segments(raw: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match (c, quote) {
            (';', None) => {
                if !current.trim().is_empty() {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            ('"' | '\'', None) => {
                quote = Some(c);
                current.push(c);
            }
            (c, Some(open)) if c == open => {
                quote = None;
                current.push(c);
            }
            (c, _) => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        segments.push(current);
    }
    segments
}
