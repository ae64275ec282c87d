use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]Z",
        )
        .unwrap_or_default()
    })
}

fn fmt_abs(dt: OffsetDateTime) -> String {
    dt.format(ts_ui_format())
        .unwrap_or_else(|_| dt.unix_timestamp().to_string())
}

/// `just now`, `5m ago`, `3h ago`, `4d ago`; absolute past two weeks or for future times.
pub(super) fn fmt_since(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let secs = (now - then).whole_seconds();
    if secs < 0 {
        return fmt_abs(then);
    }

    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;
    if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 48 {
        format!("{}h ago", hours)
    } else if days < 14 {
        format!("{}d ago", days)
    } else {
        fmt_abs(then)
    }
}

pub(super) fn fmt_unix_since(ts: i64, now: OffsetDateTime) -> String {
    match OffsetDateTime::from_unix_timestamp(ts) {
        Ok(then) if ts > 0 => fmt_since(then, now),
        _ => "-".to_string(),
    }
}

pub(super) fn fmt_unix(ts: i64) -> String {
    match OffsetDateTime::from_unix_timestamp(ts) {
        Ok(dt) if ts > 0 => fmt_abs(dt),
        _ => "-".to_string(),
    }
}

pub(super) fn fmt_ts_ui(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .map(fmt_abs)
        .unwrap_or_else(|_| ts.to_string())
}

pub(super) fn now_ts() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

#[cfg(test)]
#[path = "../tests/tui_shell/time_fmt_tests.rs"]
mod tests;
