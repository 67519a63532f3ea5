//! Span annotation validation.

use crate::error::CoreError;

/// Validate a span's character offsets: `start_offset < end_offset`.
pub fn validate_span_offsets(start_offset: i32, end_offset: i32) -> Result<(), CoreError> {
    if start_offset >= end_offset {
        return Err(CoreError::Validation(format!(
            "start_offset {start_offset} must be before end_offset {end_offset}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_span_accepted() {
        assert!(validate_span_offsets(0, 5).is_ok());
    }

    #[test]
    fn single_character_span_accepted() {
        assert!(validate_span_offsets(3, 4).is_ok());
    }

    #[test]
    fn empty_span_rejected() {
        assert!(validate_span_offsets(5, 5).is_err());
    }

    #[test]
    fn backward_span_rejected() {
        let err = validate_span_offsets(8, 2).unwrap_err();
        assert!(err.to_string().contains("must be before"));
    }
}
