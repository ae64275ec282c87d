use time::Duration;

use super::*;

#[test]
fn since_buckets_by_magnitude() {
    let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("ts");
    assert_eq!(fmt_since(now - Duration::seconds(5), now), "just now");
    assert_eq!(fmt_since(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(fmt_since(now - Duration::hours(30), now), "30h ago");
    assert_eq!(fmt_since(now - Duration::days(3), now), "3d ago");
    assert_eq!(fmt_since(now - Duration::days(30), now), "2023-10-15 22:13Z");
}

#[test]
fn unix_zero_renders_as_dash() {
    let now = OffsetDateTime::now_utc();
    assert_eq!(fmt_unix_since(0, now), "-");
    assert_eq!(fmt_unix(0), "-");
    assert_eq!(fmt_unix(1_700_000_000), "2023-11-14 22:13Z");
}

#[test]
fn non_rfc3339_timestamps_pass_through() {
    assert_eq!(fmt_ts_ui("yesterday"), "yesterday");
    assert_eq!(fmt_ts_ui("2024-01-02T03:04:05Z"), "2024-01-02 03:04Z");
}
