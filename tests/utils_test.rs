use chrono::{Month, Timelike};
use monthplgen::error::Error;
use monthplgen::utils::*;

#[test]
fn test_last_day_of_month_for_every_month() {
    let expected_2023 = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (i, days) in expected_2023.iter().enumerate() {
        let month = Month::try_from((i + 1) as u8).unwrap();
        assert_eq!(last_day_of_month(2023, month), *days, "{:?} 2023", month);
    }
}

#[test]
fn test_last_day_of_month_leap_years() {
    assert_eq!(last_day_of_month(2024, Month::February), 29);
    assert_eq!(last_day_of_month(2023, Month::February), 28);
    assert_eq!(last_day_of_month(2000, Month::February), 29);
    assert_eq!(last_day_of_month(1900, Month::February), 28);
    assert_eq!(last_day_of_month(2024, Month::December), 31);
}

#[test]
fn test_parse_month() {
    assert_eq!(parse_month("2024-02").unwrap(), (2024, Month::February));
    assert_eq!(parse_month("1999-12").unwrap(), (1999, Month::December));
    assert_eq!(parse_month(" 2024-07 ").unwrap(), (2024, Month::July));
}

#[test]
fn test_parse_month_rejects_garbage() {
    for label in [
        "", "2024", "2024-13", "2024-00", "abcd-ef", "2024-02-05", "02-2024",
        "24-02", "2024-2", "+2024-02", "2024-+2", " 2024-02x",
    ] {
        match parse_month(label) {
            Err(Error::InvalidMonthFormat(got)) => assert_eq!(got, label),
            other => panic!("expected InvalidMonthFormat for {:?}, got {:?}", label, other),
        }
    }
}

#[test]
fn test_resolve_month_february_leap_year_utc() {
    let range = resolve_month("2024-02", "UTC").unwrap();

    assert_eq!(range.label, "2024-02");
    assert_eq!(range.year, 2024);
    assert_eq!(range.month, Month::February);
    assert_eq!(range.last_day, 29);

    // 2024-02-01T00:00:00Z
    assert_eq!(range.start_ts(), 1706745600);
    // 2024-02-29T00:00:00Z
    assert_eq!(range.end_ts(), 1709164800);
    // 2024-03-01T00:00:00Z
    assert_eq!(range.next_start_ts(), 1709251200);
}

#[test]
fn test_resolve_month_december_rolls_into_next_year() {
    let range = resolve_month("2023-12", "UTC").unwrap();
    assert_eq!(range.last_day, 31);
    // 2023-12-31T00:00:00Z
    assert_eq!(range.end_ts(), 1703980800);
    // 2024-01-01T00:00:00Z
    assert_eq!(range.next_start_ts(), 1704067200);
}

#[test]
fn test_resolve_month_is_anchored_in_timezone() {
    let range = resolve_month("2024-02", "Europe/Berlin").unwrap();
    // Midnight in Berlin is 23:00 UTC the day before during winter time.
    assert_eq!(range.start_ts(), 1706745600 - 3600);
    assert_eq!(range.start.hour(), 0);
    assert_eq!(range.end.hour(), 0);
}

#[test]
fn test_resolve_month_accepts_lowercase_timezone() {
    let upper = resolve_month("2024-02", "UTC").unwrap();
    let lower = resolve_month("2024-02", "utc").unwrap();
    assert_eq!(upper.start_ts(), lower.start_ts());
    assert_eq!(upper.end_ts(), lower.end_ts());
}

#[test]
fn test_resolve_month_unknown_timezone() {
    match resolve_month("2024-02", "Mars/Olympus_Mons") {
        Err(Error::UnknownTimezone(tz)) => assert_eq!(tz, "Mars/Olympus_Mons"),
        other => panic!("expected UnknownTimezone, got {:?}", other),
    }
}

#[test]
fn test_resolve_month_checks_format_before_timezone() {
    assert!(matches!(
        resolve_month("not-a-month", "Mars/Olympus_Mons"),
        Err(Error::InvalidMonthFormat(_))
    ));
}

#[test]
fn test_cursor_seed() {
    let range = resolve_month("2024-02", "UTC").unwrap();
    assert_eq!(range.cursor_seed(false), range.end_ts());
    assert_eq!(range.cursor_seed(true), range.next_start_ts());
}

#[test]
fn test_current_month_label_shape() {
    let label = current_month_label("UTC").unwrap();
    assert_eq!(label.len(), 7);
    assert!(parse_month(&label).is_ok());
}

#[test]
fn test_recording_uri() {
    assert_eq!(
        recording_uri("a5b8a2c4-3b3e-4f1a-9f5a-2c6d4e1b7f00"),
        "https://musicbrainz.org/recording/a5b8a2c4-3b3e-4f1a-9f5a-2c6d4e1b7f00"
    );
}
