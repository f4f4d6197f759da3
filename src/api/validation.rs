use super::ApiError;
use crate::constants::limits::MAX_LOCATION_LEN;

pub fn validate_location(location: &str) -> Result<&str, ApiError> {
    if location.chars().count() > MAX_LOCATION_LEN {
        return Err(ApiError::validation(format!(
            "Location must be {MAX_LOCATION_LEN} characters or less"
        )));
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_location() {
        assert!(validate_location("Park").is_ok());
        assert!(validate_location(&"x".repeat(MAX_LOCATION_LEN + 1)).is_err());
    }
}
