//! Score validation.
//!
//! All score checks go through [`ScorePolicy`] so every edit path states which
//! bounds it enforces:
//!
//! - `QuickEdit`: the roster's inline monthly score cell. Score must be finite
//!   and within 0-100.
//! - `RecordEditor`: full assessment/exam records. Score and max score must be
//!   finite and non-negative; there is no upper bound.

use shared::ScoreInput;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreValidationError {
    #[error("Please enter a valid score: '{0}' is not a number")]
    NotANumber(String),
    #[error("Please enter a valid score ({min}-{max}), got {score}")]
    OutOfRange { score: f64, min: f64, max: f64 },
    #[error("Score must be a non-negative number, got {0}")]
    InvalidScore(f64),
    #[error("Max score must be a non-negative number, got {0}")]
    InvalidMaxScore(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePolicy {
    QuickEdit,
    RecordEditor,
}

impl ScorePolicy {
    pub const QUICK_EDIT_MIN: f64 = 0.0;
    pub const QUICK_EDIT_MAX: f64 = 100.0;

    /// Validate a single score and return it unchanged when accepted
    pub fn check_score(&self, score: f64) -> Result<f64, ScoreValidationError> {
        match self {
            ScorePolicy::QuickEdit => {
                let in_range = (Self::QUICK_EDIT_MIN..=Self::QUICK_EDIT_MAX).contains(&score);
                if !score.is_finite() || !in_range {
                    return Err(ScoreValidationError::OutOfRange {
                        score,
                        min: Self::QUICK_EDIT_MIN,
                        max: Self::QUICK_EDIT_MAX,
                    });
                }
            }
            ScorePolicy::RecordEditor => {
                if !score.is_finite() || score < 0.0 {
                    return Err(ScoreValidationError::InvalidScore(score));
                }
            }
        }
        Ok(score)
    }

    /// Validate a score together with its maximum
    pub fn check_record(&self, score: f64, max_score: f64) -> Result<(), ScoreValidationError> {
        if !max_score.is_finite() || max_score < 0.0 {
            return Err(ScoreValidationError::InvalidMaxScore(max_score));
        }
        self.check_score(score)?;
        Ok(())
    }
}

/// Turn the raw quick-edit input into a number. Text is trimmed; anything that
/// does not parse as a finite number is rejected.
pub fn parse_score_input(input: &ScoreInput) -> Result<f64, ScoreValidationError> {
    let value = match input {
        ScoreInput::Number(value) => *value,
        ScoreInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| ScoreValidationError::NotANumber(text.clone()))?,
    };

    if value.is_nan() {
        return Err(ScoreValidationError::NotANumber(value.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_edit_bounds() {
        let policy = ScorePolicy::QuickEdit;
        assert_eq!(policy.check_score(0.0), Ok(0.0));
        assert_eq!(policy.check_score(100.0), Ok(100.0));
        assert!(policy.check_score(-0.5).is_err());
        assert!(policy.check_score(100.5).is_err());
        assert!(policy.check_score(f64::INFINITY).is_err());
    }

    #[test]
    fn test_record_editor_has_no_upper_bound() {
        let policy = ScorePolicy::RecordEditor;
        assert_eq!(policy.check_score(250.0), Ok(250.0));
        assert!(policy.check_score(-1.0).is_err());
        assert!(policy.check_record(10.0, 200.0).is_ok());
        assert!(policy.check_record(10.0, 0.0).is_ok());
        assert_eq!(
            policy.check_record(10.0, -5.0),
            Err(ScoreValidationError::InvalidMaxScore(-5.0))
        );
    }

    #[test]
    fn test_parse_score_input() {
        assert_eq!(parse_score_input(&ScoreInput::Text(" 77 ".to_string())), Ok(77.0));
        assert_eq!(parse_score_input(&ScoreInput::Number(88.5)), Ok(88.5));
        assert!(matches!(
            parse_score_input(&ScoreInput::Text("abc".to_string())),
            Err(ScoreValidationError::NotANumber(_))
        ));
        assert!(parse_score_input(&ScoreInput::Text("".to_string())).is_err());
        assert!(parse_score_input(&ScoreInput::Text("NaN".to_string())).is_err());
    }

    #[test]
    fn test_error_message_is_user_facing() {
        let err = ScorePolicy::QuickEdit.check_score(120.0).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid score (0-100), got 120");
    }
}
