//! Time-based cancellation refunds: the earlier the cancellation, the
//! larger the refunded share of the total.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Refund fraction by lead time before the stay begins.
///
/// More than a week out refunds 90%, four to seven days refunds half,
/// three days or less refunds nothing.
pub fn refund_fraction(days_until_start: i64) -> f64 {
    if days_until_start > 7 {
        0.9
    } else if days_until_start > 3 {
        0.5
    } else {
        0.0
    }
}

/// Whole days until the booking starts, partial days rounded up and past
/// starts floored at zero.
pub fn days_until(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (start - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// Refund owed for cancelling a booking worth `total` at `now`.
pub fn refund_amount(total: f64, start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    total * refund_fraction(days_until(start, now))
}
