use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};
use time::macros::date;

use super::PublishDate;

#[test]
fn publish_date_roundtrips() {
    let mut runner = TestRunner::new(Config {
        cases: 32,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&(1970i32..=2100, 1u32..=12, 1u32..=28), |(year, month, day)| {
            let s = format!("{year:04}-{month:02}-{day:02}");
            let parsed = PublishDate::parse(&s).expect("valid date");
            prop_assert_eq!(parsed.as_str(), s);
            prop_assert_eq!(parsed.year(), year);
            Ok(())
        })
        .unwrap();
}

#[test]
fn publish_date_rejects_out_of_range() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&(1970i32..=2100, 13u32..=99, 32u32..=99), |(year, month, day)| {
            let s = format!("{year:04}-{month:02}-{day:02}");
            prop_assert!(PublishDate::parse(&s).is_none());
            Ok(())
        })
        .unwrap();
}

#[test]
fn publish_date_accepts_timestamps() {
    let rfc = PublishDate::parse("2024-01-10T23:30:00-02:00").expect("rfc3339");
    // Normalised to UTC, which rolls over to the next day.
    assert_eq!(rfc.as_str(), "2024-01-11");
    assert_eq!(rfc.as_date(), date!(2024 - 01 - 11));

    let spaced = PublishDate::parse("2024-01-10 08:00:00").expect("spaced");
    assert_eq!(spaced.as_str(), "2024-01-10");
    assert!(spaced > PublishDate::parse("2024-01-10").unwrap());
}

#[test]
fn publish_date_formats_rfc2822() {
    let date = PublishDate::parse("2024-01-10").unwrap();
    assert_eq!(date.to_rfc2822(), "Wed, 10 Jan 2024 00:00:00 +0000");
}

#[test]
fn publish_date_rejects_garbage() {
    for raw in ["", "yesterday", "2024/01/10", "10-01-2024"] {
        assert!(PublishDate::parse(raw).is_none(), "{raw:?} should not parse");
    }
}
