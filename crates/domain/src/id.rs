//! Fixed-width binary identifiers.
//!
//! Every id column stores the 16 raw bytes of a UUID and every lookup binds
//! the same 16 bytes. Text only exists at the edges: callers hand in the
//! hyphenated form and get the hyphenated form back. `encode` and `decode`
//! must stay exact inverses, otherwise lookups silently match nothing.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Length of the canonical `8-4-4-4-12` text form.
const HYPHENATED_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("malformed identifier '{0}': expected a hyphenated UUID")]
    Malformed(String),
    #[error("binary identifier must be 16 bytes, got {0}")]
    Length(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryId([u8; 16]);

impl BinaryId {
    /// Fresh random (version 4) identifier.
    pub fn new_v4() -> Self {
        Self(*Uuid::new_v4().as_bytes())
    }

    /// Text → bytes. Only the hyphenated form is accepted; upper-case hex
    /// digits are tolerated and come back lower-case from `decode`.
    pub fn encode(text: &str) -> Result<Self, IdError> {
        if text.len() != HYPHENATED_LEN {
            return Err(IdError::Malformed(text.to_string()));
        }
        let uuid = Uuid::try_parse(text).map_err(|_| IdError::Malformed(text.to_string()))?;
        Ok(Self(*uuid.as_bytes()))
    }

    /// Bytes → canonical lower-case hyphenated text.
    pub fn decode(&self) -> String {
        Uuid::from_bytes(self.0).hyphenated().to_string()
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; 16] = bytes.try_into().map_err(|_| IdError::Length(bytes.len()))?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for BinaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Uuid::from_bytes(self.0).hyphenated())
    }
}

impl fmt::Debug for BinaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryId({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode() {
        let samples = [
            "00000000-0000-0000-0000-000000000000",
            "ffffffff-ffff-ffff-ffff-ffffffffffff",
            "3f2504e0-4f89-41d3-9a0c-0305e82c3301",
            "a7b1c2d3-e4f5-4a6b-8c7d-9e0f1a2b3c4d",
        ];
        for text in samples {
            let id = BinaryId::encode(text).unwrap();
            assert_eq!(id.decode(), text);
        }
    }

    #[test]
    fn generated_ids_survive_the_codec() {
        for _ in 0..64 {
            let id = BinaryId::new_v4();
            let text = id.decode();
            assert_eq!(BinaryId::encode(&text).unwrap(), id);
            assert_eq!(BinaryId::from_slice(id.as_bytes()).unwrap(), id);
        }
    }

    #[test]
    fn new_v4_sets_the_version_nibble() {
        let id = BinaryId::new_v4();
        assert_eq!(id.as_bytes()[6] >> 4, 4);
        assert_ne!(BinaryId::new_v4(), id);
    }

    #[test]
    fn encode_lays_bytes_out_in_text_order() {
        let id = BinaryId::encode("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        assert_eq!(
            id.as_bytes(),
            &[
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
                0xee, 0xff
            ]
        );
    }

    #[test]
    fn upper_case_input_decodes_lower_case() {
        let upper = BinaryId::encode("3F2504E0-4F89-41D3-9A0C-0305E82C3301").unwrap();
        let lower = BinaryId::encode("3f2504e0-4f89-41d3-9a0c-0305e82c3301").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.decode(), "3f2504e0-4f89-41d3-9a0c-0305e82c3301");
    }

    #[test]
    fn rejects_non_hyphenated_forms() {
        for bad in [
            "",
            "not-a-uuid",
            "3f2504e04f8941d39a0c0305e82c3301",
            "{3f2504e0-4f89-41d3-9a0c-0305e82c3301}",
            "urn:uuid:3f2504e0-4f89-41d3-9a0c-0305e82c3301",
            "3f2504e0-4f89-41d3-9a0c-0305e82c330g",
            "3f2504e0x4f89x41d3x9a0cx0305e82c3301",
        ] {
            assert!(
                matches!(BinaryId::encode(bad), Err(IdError::Malformed(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn from_slice_checks_length() {
        assert_eq!(BinaryId::from_slice(&[0u8; 15]), Err(IdError::Length(15)));
        assert_eq!(BinaryId::from_slice(&[0u8; 17]), Err(IdError::Length(17)));
        assert_eq!(BinaryId::from_slice(&[7u8; 16]).unwrap().as_bytes(), &[7u8; 16]);
    }

    #[test]
    fn display_and_debug_agree_with_codec() {
        let text = "a7b1c2d3-e4f5-4a6b-8c7d-9e0f1a2b3c4d";
        let id = BinaryId::encode(text).unwrap();
        assert_eq!(id.to_string(), text);
        assert_eq!(format!("{id:?}"), format!("BinaryId({text})"));
    }
}
