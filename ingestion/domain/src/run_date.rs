use chrono::{Days, NaiveDate};

const RUN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Picks the delivery date a run processes: the configured date if any,
/// otherwise the day before `today`.
pub fn resolve_run_date(configured: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    configured.unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN)
    })
}

pub fn parse_run_date(value: &str) -> Result<NaiveDate, RunDateError> {
    NaiveDate::parse_from_str(value.trim(), RUN_DATE_FORMAT)
        .map_err(|_| RunDateError::InvalidFormat(value.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum RunDateError {
    #[error("Invalid run date '{0}', expected YYYY-MM-DD")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_yesterday() {
        let today = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();

        assert_eq!(
            resolve_run_date(None, today),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_yesterday_crosses_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert_eq!(
            resolve_run_date(None, today),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_configured_date_wins() {
        let today = NaiveDate::from_ymd_opt(2023, 7, 10).unwrap();
        let configured = NaiveDate::from_ymd_opt(2023, 7, 2).unwrap();

        assert_eq!(resolve_run_date(Some(configured), today), configured);
    }

    #[test]
    fn test_parse_run_date() {
        assert_eq!(
            parse_run_date("2023-06-30").unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
        );
        assert!(matches!(
            parse_run_date("30/06/2023"),
            Err(RunDateError::InvalidFormat(_))
        ));
    }
}
