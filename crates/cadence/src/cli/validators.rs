//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use cadence_calendar::parse_day_count;

/// Validate a duration like `6m`, `24w`, `180d` or `3` (weeks) and convert
/// it to days.
pub fn validate_duration(s: &str) -> Result<i64, String> {
    parse_day_count(s).map_err(|e| e.to_string())
}

/// Validate a project namespace: letters and digits only.
pub fn validate_project(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Project cannot be empty".to_string());
    }
    if !trimmed.chars().all(char::is_alphanumeric) {
        return Err(format!(
            "Invalid project '{trimmed}'. Use letters and digits only (e.g. PEACH)"
        ));
    }
    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::months("2m", 60)]
    #[case::weeks("8w", 56)]
    #[case::days("60d", 60)]
    #[case::bare_weeks("3", 21)]
    fn test_validate_duration(#[case] input: &str, #[case] days: i64) {
        assert_eq!(validate_duration(input), Ok(days));
    }

    #[test]
    fn test_validate_duration_rejects_garbage() {
        assert!(validate_duration("soon").is_err());
    }

    #[rstest]
    #[case::weeks_overflow("2000000000000000000w")]
    #[case::days("99999999999d")]
    fn test_validate_duration_rejects_huge(#[case] input: &str) {
        let err = validate_duration(input).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
    }

    #[rstest]
    #[case::upper("PEACH", Ok("PEACH".to_string()))]
    #[case::lower(" peach ", Ok("PEACH".to_string()))]
    #[case::empty("  ", Err(()))]
    #[case::dash("PE-ACH", Err(()))]
    fn test_validate_project(#[case] input: &str, #[case] expected: Result<String, ()>) {
        assert_eq!(validate_project(input).map_err(|_| ()), expected);
    }
}
