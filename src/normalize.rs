//! Unicode normalization applied to indexed strings and queries.
//!
//! Normalization happens exactly once per string: at ingest for indexed
//! strings and at request entry for queries. The distance kernels never
//! normalize.

use unicode_normalization::UnicodeNormalization;

use crate::error::{NeardexError, Result};

/// A Unicode normal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl NormalForm {
    /// Parse a normal form by name, case-insensitively. The empty string
    /// selects no normalization.
    pub fn parse(name: &str) -> Result<Option<NormalForm>> {
        match name.to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "nfc" => Ok(Some(NormalForm::Nfc)),
            "nfd" => Ok(Some(NormalForm::Nfd)),
            "nfkc" => Ok(Some(NormalForm::Nfkc)),
            "nfkd" => Ok(Some(NormalForm::Nfkd)),
            _ => Err(NeardexError::UnknownNormalization(name.to_string())),
        }
    }

    /// Lowercase name of this form, as reported by `/info`.
    pub fn name(&self) -> &'static str {
        match self {
            NormalForm::Nfc => "nfc",
            NormalForm::Nfd => "nfd",
            NormalForm::Nfkc => "nfkc",
            NormalForm::Nfkd => "nfkd",
        }
    }

    /// Normalize `s` into a fresh string.
    pub fn apply(&self, s: &str) -> String {
        match self {
            NormalForm::Nfc => s.nfc().collect(),
            NormalForm::Nfd => s.nfd().collect(),
            NormalForm::Nfkc => s.nfkc().collect(),
            NormalForm::Nfkd => s.nfkd().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(NormalForm::parse("NFC").unwrap(), Some(NormalForm::Nfc));
        assert_eq!(NormalForm::parse("nfkd").unwrap(), Some(NormalForm::Nfkd));
        assert_eq!(NormalForm::parse("").unwrap(), None);
        assert!(NormalForm::parse("nfx").is_err());
    }

    #[test]
    fn test_nfc_composes() {
        // "e" + COMBINING DIAERESIS composes to U+00EB.
        assert_eq!(NormalForm::Nfc.apply("e\u{0308}"), "\u{00eb}");
    }

    #[test]
    fn test_nfd_decomposes() {
        assert_eq!(NormalForm::Nfd.apply("\u{00eb}"), "e\u{0308}");
    }

    #[test]
    fn test_nfkd_compatibility() {
        // LATIN SMALL LIGATURE FI decomposes under NFKD only.
        assert_eq!(NormalForm::Nfkd.apply("\u{fb01}"), "fi");
        assert_eq!(NormalForm::Nfd.apply("\u{fb01}"), "\u{fb01}");
    }
}
