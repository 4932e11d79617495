use crate::shared::errors::AppError;

pub struct Validator;

impl Validator {
    /// At least one localized title must be present. Length is unbounded.
    pub fn validate_titles(titles: [Option<&str>; 3]) -> Result<(), AppError> {
        let present = titles
            .into_iter()
            .flatten()
            .any(|title| !title.trim().is_empty());

        if !present {
            return Err(AppError::ValidationError(
                "At least one title is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_external_id(external_id: i32) -> Result<(), AppError> {
        if external_id <= 0 {
            return Err(AppError::ValidationError(format!(
                "External ID must be positive, got {}",
                external_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_require_one_non_blank() {
        assert!(Validator::validate_titles([None, None, None]).is_err());
        assert!(Validator::validate_titles([Some("  "), None, None]).is_err());
        assert!(Validator::validate_titles([None, Some("Cowboy Bebop"), None]).is_ok());
    }

    #[test]
    fn test_long_title_is_accepted() {
        let long = "a".repeat(1000);
        assert!(Validator::validate_titles([Some(&long), None, None]).is_ok());
    }

    #[test]
    fn test_external_id_positive() {
        assert!(Validator::validate_external_id(21).is_ok());
        assert!(Validator::validate_external_id(0).is_err());
    }
}
