//! Pincode validation, applied before any network call.

pub const PINCODE_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PincodeError {
    #[error("Please enter a pincode")]
    Empty,
    #[error("Please enter a valid 6-digit pincode")]
    InvalidFormat,
}

/// Trim `raw` and check it is exactly six ASCII digits.
///
/// # Errors
///
/// [`PincodeError::Empty`] for blank input, [`PincodeError::InvalidFormat`]
/// for anything else that is not six digits.
pub fn validate_pincode(raw: &str) -> Result<&str, PincodeError> {
    let pincode = raw.trim();
    if pincode.is_empty() {
        return Err(PincodeError::Empty);
    }
    if pincode.len() != PINCODE_LEN || !pincode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PincodeError::InvalidFormat);
    }
    Ok(pincode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_digits_and_trims() {
        assert_eq!(validate_pincode("110001"), Ok("110001"));
        assert_eq!(validate_pincode(" 560034 "), Ok("560034"));
    }

    #[test]
    fn blank_is_empty() {
        assert_eq!(validate_pincode(""), Err(PincodeError::Empty));
        assert_eq!(validate_pincode("   "), Err(PincodeError::Empty));
    }

    #[test]
    fn wrong_length_or_characters_is_invalid() {
        assert_eq!(validate_pincode("11000"), Err(PincodeError::InvalidFormat));
        assert_eq!(validate_pincode("1100011"), Err(PincodeError::InvalidFormat));
        assert_eq!(validate_pincode("11000a"), Err(PincodeError::InvalidFormat));
        assert_eq!(validate_pincode("１１０００１"), Err(PincodeError::InvalidFormat));
    }
}
