//! Index normalization: date formatting and the totals sentinel.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt::Write;

use crate::config::DateFormats;
use crate::model::{DimensionLike, Index, Level, ResultTable, Scalar};

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Prepare a working table for reshaping.
///
/// Formats datetime index levels, replaces missing index values with the
/// totals sentinel and flags the flat column level as the metrics level.
pub fn normalize_table(
    table: &mut ResultTable,
    dimensions: &[&dyn DimensionLike],
    formats: &DateFormats,
) {
    normalize_index(table.index_mut(), dimensions, formats);

    let columns = table.columns_mut();
    if columns.nlevels() == 1 {
        columns.set_level(0, Level::Metrics);
    }
}

/// Format datetime levels and fill missing values with [`Scalar::Totals`].
///
/// Levels are matched to dimensions by key. An empty index is left as is.
pub fn normalize_index(index: &mut Index, dimensions: &[&dyn DimensionLike], formats: &DateFormats) {
    if index.is_empty() {
        return;
    }

    for dimension in dimensions {
        let Some(interval) = dimension.interval() else {
            continue;
        };
        let Some(pos) = index.position_of(&dimension.key()) else {
            continue;
        };
        let pattern = formats.for_interval(interval);
        index.map_level(pos, |value| format_date_value(value, pattern));
    }

    index.fill_missing(&Scalar::Totals);
}

/// Render a datetime (or a string holding one) with `pattern`.
///
/// Anything that is not a date passes through unchanged.
pub fn format_date_value(value: &Scalar, pattern: &str) -> Scalar {
    let dt = match value {
        Scalar::DateTime(dt) => *dt,
        Scalar::Str(s) => match parse_datetime(s) {
            Some(dt) => dt,
            None => return value.clone(),
        },
        _ => return value.clone(),
    };
    Scalar::Str(render_date(&dt, pattern))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches('Z');
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn render_date(dt: &NaiveDateTime, pattern: &str) -> String {
    let quarter = (dt.month0() / 3 + 1).to_string();
    let pattern = pattern.replace("%q", &quarter);

    let mut out = String::new();
    if write!(out, "{}", dt.format(&pattern)).is_err() {
        // Invalid pattern; fall back to the ISO date.
        out.clear();
        let _ = write!(out, "{}", dt.format("%Y-%m-%d"));
    }
    out
}
