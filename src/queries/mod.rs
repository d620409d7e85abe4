pub mod indicator_queries;
pub mod order_queries;
pub mod product_queries;
pub mod production_queries;
pub mod support_queries;
pub mod transaction_queries;
pub mod user_queries;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{Postgres, QueryBuilder};

/// Turns an inclusive day range into `[start 00:00, day after end 00:00)` in UTC.
pub(crate) fn day_bounds(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = start.map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let until = end
        .and_then(|d| d.succ_opt())
        .map(|d| d.and_time(NaiveTime::MIN).and_utc());
    (from, until)
}

pub(crate) fn push_date_range(
    query: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    let (from, until) = day_bounds(start, end);

    if let Some(from) = from {
        query.push(format!(" AND {} >= ", column));
        query.push_bind(from);
    }

    if let Some(until) = until {
        query.push(format!(" AND {} < ", column));
        query.push_bind(until);
    }
}
