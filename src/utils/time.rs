use chrono::{DateTime, Utc};

/* Sortable, filesystem safe: 20240506T070809Z */
pub fn archive_stamp(now: DateTime<Utc>) -> String {
    return now.format("%Y%m%dT%H%M%SZ").to_string();
}
