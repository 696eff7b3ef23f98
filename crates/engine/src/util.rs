//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same rules.

use crate::{EngineError, ResultEngine};

/// Amounts are magnitudes: the entry kind carries the sign.
pub(crate) fn ensure_positive_amount(amount: i64) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert!(ensure_positive_amount(0).is_err());
        assert!(ensure_positive_amount(-5).is_err());
        assert!(ensure_positive_amount(1).is_ok());
    }

    #[test]
    fn blank_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")),
            Some("rent".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
