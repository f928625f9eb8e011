use std::time::Duration;
use chrono::{DateTime, Utc};

/// Describe how long ago `then` was, relative to `now`.
/// Always floors; a `then` in the future counts as zero seconds.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds().max(0);

    if diff < 60 {
        format!("{} seconds ago", diff)
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

/// Text for the freshness label given the time since the last refresh.
pub fn freshness_label(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs <= 5 {
        "Just now".to_string()
    } else {
        format!("{} seconds ago", secs)
    }
}
