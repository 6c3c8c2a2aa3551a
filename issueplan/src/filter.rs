use chrono::{Datelike, Local, Month};

use crate::config::{Config, Issue};
use crate::errors::MonthError;

/// Converts a 1-based month number into a [`Month`].
pub fn parse_month(number: i64) -> Result<Month, MonthError> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .ok_or(MonthError(number))
}

/// Month of the local calendar date.
pub fn current_month() -> Month {
    let number = Local::now().month();
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .unwrap_or(Month::January)
}

/// Issues scheduled for `month`, in configuration order.
pub fn issues_for_month(config: &Config, month: Month) -> Vec<&Issue> {
    config
        .issues
        .iter()
        .filter(|issue| issue.is_creation_month(month))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(name: &str, months: &[i64]) -> Issue {
        Issue {
            name: name.to_string(),
            creation_months: months.to_vec(),
            ..Issue::default()
        }
    }

    #[test]
    fn parses_calendar_months_only() {
        assert_eq!(parse_month(1), Ok(Month::January));
        assert_eq!(parse_month(12), Ok(Month::December));
        assert_eq!(parse_month(0), Err(MonthError(0)));
        assert_eq!(parse_month(13), Err(MonthError(13)));
        assert_eq!(parse_month(-3), Err(MonthError(-3)));
        assert_eq!(parse_month(257), Err(MonthError(257)));
    }

    #[test]
    fn selects_issues_by_membership() {
        let config = Config {
            issues: vec![
                issue("quarterly", &[1, 4, 7, 10]),
                issue("yearly", &[12]),
                issue("monthly", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]),
            ],
            ..Config::default()
        };

        let april: Vec<&str> = issues_for_month(&config, Month::April)
            .iter()
            .map(|issue| issue.name.as_str())
            .collect();
        assert_eq!(april, ["quarterly", "monthly"]);

        let december: Vec<&str> = issues_for_month(&config, Month::December)
            .iter()
            .map(|issue| issue.name.as_str())
            .collect();
        assert_eq!(december, ["yearly", "monthly"]);
    }

    #[test]
    fn no_matches_is_empty() {
        let config = Config {
            issues: vec![issue("yearly", &[12])],
            ..Config::default()
        };
        assert!(issues_for_month(&config, Month::March).is_empty());
    }
}
