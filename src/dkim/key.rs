use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::debug;

use super::types::DkimTags;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum KeyDecodeError {
    #[error("public key is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("expected DER tag {expected:#04x} at offset {offset}, found {found:#04x}")]
    UnexpectedTag { expected: u8, found: u8, offset: usize },
    #[error("DER structure truncated at offset {offset}")]
    Truncated { offset: usize },
    #[error("unsupported DER length encoding at offset {offset}")]
    BadLength { offset: usize },
}

/// Modulus strength of the record's RSA public key, in bits.
///
/// `None` when the key is missing or does not decode; decode problems are
/// logged and never escape this function.
pub fn key_bits(tags: &DkimTags) -> Option<u32> {
    let public_key = tags.public_key.as_deref()?;
    match modulus_bits(public_key) {
        Ok(bits) => Some(bits),
        Err(err) => {
            debug!(error = %err, "DKIM public key did not decode");
            None
        }
    }
}

/// Decodes the base64 `p=` value and walks the DER structure to the RSA
/// modulus, accepting both a raw RSAPublicKey and a SubjectPublicKeyInfo
/// wrapper.
fn modulus_bits(public_key: &str) -> Result<u32, KeyDecodeError> {
    let mut cleaned: String = public_key
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != '"' && *c != '\'')
        .collect();
    while cleaned.len() % 4 != 0 {
        cleaned.push('=');
    }
    let der = STANDARD.decode(cleaned.as_bytes())?;

    let mut cursor = DerCursor::new(&der);
    cursor.expect_tag(TAG_SEQUENCE)?;
    cursor.read_length()?;

    if cursor.peek()? == TAG_SEQUENCE {
        // SubjectPublicKeyInfo: skip the AlgorithmIdentifier, unwrap the
        // BIT STRING, then enter the inner RSAPublicKey sequence.
        cursor.expect_tag(TAG_SEQUENCE)?;
        let algorithm_len = cursor.read_length()?;
        cursor.skip(algorithm_len)?;
        cursor.expect_tag(TAG_BIT_STRING)?;
        cursor.read_length()?;
        cursor.read_byte()?; // unused-bits count
        cursor.expect_tag(TAG_SEQUENCE)?;
        cursor.read_length()?;
    }

    cursor.expect_tag(TAG_INTEGER)?;
    let mut modulus_len = cursor.read_length()?;
    if modulus_len > 0 && cursor.peek()? == 0x00 {
        modulus_len -= 1;
    }
    Ok((modulus_len as u32) * 8)
}

/// Minimal DER reader: explicit offset, bounds-checked reads, no raw index
/// arithmetic at call sites.
struct DerCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> DerCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn peek(&self) -> Result<u8, KeyDecodeError> {
        self.bytes
            .get(self.offset)
            .copied()
            .ok_or(KeyDecodeError::Truncated { offset: self.offset })
    }

    fn read_byte(&mut self) -> Result<u8, KeyDecodeError> {
        let byte = self.peek()?;
        self.offset += 1;
        Ok(byte)
    }

    fn expect_tag(&mut self, expected: u8) -> Result<(), KeyDecodeError> {
        let offset = self.offset;
        let found = self.read_byte()?;
        if found != expected {
            return Err(KeyDecodeError::UnexpectedTag {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    /// Short- or long-form DER length.
    fn read_length(&mut self) -> Result<usize, KeyDecodeError> {
        let offset = self.offset;
        let first = self.read_byte()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(KeyDecodeError::BadLength { offset });
        }
        let mut length = 0usize;
        for _ in 0..count {
            length = (length << 8) | self.read_byte()? as usize;
        }
        Ok(length)
    }

    fn skip(&mut self, count: usize) -> Result<(), KeyDecodeError> {
        if self.bytes.len() - self.offset < count {
            return Err(KeyDecodeError::Truncated { offset: self.offset });
        }
        self.offset += count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der_length(len: usize) -> Vec<u8> {
        if len < 0x80 {
            return vec![len as u8];
        }
        let mut payload = Vec::new();
        let mut remaining = len;
        while remaining > 0 {
            payload.insert(0, (remaining & 0xff) as u8);
            remaining >>= 8;
        }
        let mut out = vec![0x80 | payload.len() as u8];
        out.extend(payload);
        out
    }

    fn element(tag: u8, content: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        out.extend(der_length(content.len()));
        out.extend_from_slice(content);
        out
    }

    /// RSAPublicKey: SEQUENCE { modulus INTEGER, exponent INTEGER }.
    fn rsa_public_key(modulus_bytes: usize) -> Vec<u8> {
        let mut modulus = vec![0x00];
        modulus.extend(std::iter::repeat_n(0xAB, modulus_bytes));
        let mut content = element(TAG_INTEGER, &modulus);
        content.extend(element(TAG_INTEGER, &[0x01, 0x00, 0x01]));
        element(TAG_SEQUENCE, &content)
    }

    fn spki(modulus_bytes: usize) -> Vec<u8> {
        let rsa_oid = element(
            0x06,
            &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01],
        );
        let mut algorithm = rsa_oid;
        algorithm.extend(element(0x05, &[]));
        let algorithm = element(TAG_SEQUENCE, &algorithm);

        let mut bit_string = vec![0x00];
        bit_string.extend(rsa_public_key(modulus_bytes));

        let mut content = algorithm;
        content.extend(element(TAG_BIT_STRING, &bit_string));
        element(TAG_SEQUENCE, &content)
    }

    fn tags_with_key(der: &[u8]) -> DkimTags {
        DkimTags {
            public_key: Some(STANDARD.encode(der)),
            ..DkimTags::default()
        }
    }

    #[test]
    fn spki_wrapped_2048_bit_key() {
        let tags = tags_with_key(&spki(256));
        assert_eq!(key_bits(&tags), Some(2048));
    }

    #[test]
    fn spki_wrapped_1024_bit_key() {
        let tags = tags_with_key(&spki(128));
        assert_eq!(key_bits(&tags), Some(1024));
    }

    #[test]
    fn raw_rsa_public_key_without_wrapper() {
        let tags = tags_with_key(&rsa_public_key(256));
        assert_eq!(key_bits(&tags), Some(2048));
    }

    #[test]
    fn whitespace_and_quotes_are_stripped_before_decoding() {
        let encoded = STANDARD.encode(spki(256));
        let (head, tail) = encoded.split_at(10);
        let tags = DkimTags {
            public_key: Some(format!("\"{head} {tail}\"")),
            ..DkimTags::default()
        };
        assert_eq!(key_bits(&tags), Some(2048));
    }

    #[test]
    fn unpadded_base64_is_padded_before_decoding() {
        let encoded = STANDARD.encode(spki(256));
        let tags = DkimTags {
            public_key: Some(encoded.trim_end_matches('=').to_string()),
            ..DkimTags::default()
        };
        assert_eq!(key_bits(&tags), Some(2048));
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(key_bits(&DkimTags::default()), None);
    }

    #[test]
    fn invalid_base64_is_none() {
        let tags = DkimTags {
            public_key: Some("!!!not-base64!!!".to_string()),
            ..DkimTags::default()
        };
        assert_eq!(key_bits(&tags), None);
    }

    #[test]
    fn truncated_der_is_none() {
        let mut der = spki(256);
        der.truncate(12);
        assert_eq!(key_bits(&tags_with_key(&der)), None);
    }

    #[test]
    fn wrong_outer_tag_is_none() {
        let mut der = spki(256);
        der[0] = 0x04;
        assert_eq!(key_bits(&tags_with_key(&der)), None);
    }

    #[test]
    fn leading_zero_padding_is_not_counted() {
        // 2048-bit modulus is stored as 257 bytes: 0x00 + 256 value bytes
        let spki_bytes = spki(256);
        let decoded_len = {
            let mut cursor = DerCursor::new(&spki_bytes);
            cursor.expect_tag(TAG_SEQUENCE).unwrap();
            cursor.read_length().unwrap()
        };
        assert!(decoded_len > 256);
        assert_eq!(key_bits(&tags_with_key(&spki_bytes)), Some(2048));
    }
}
