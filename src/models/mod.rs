// Persisted records: one DailyTpsRecord per calendar day, plus the single
// in-flight Checkpoint for the day currently being tallied.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyTpsRecord {
    pub date: NaiveDate,
    pub tps: f64,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub start_height: i64,
    pub end_height: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyTpsRecord {
    /// A record written before its day ended only covers part of that day.
    pub fn is_complete(&self) -> bool {
        match self.date.checked_add_days(Days::new(1)) {
            Some(next) => self.updated_at >= next.and_time(NaiveTime::MIN).and_utc(),
            None => true,
        }
    }
}

/// Values needed to upsert a day; audit timestamps are filled in by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyTps {
    pub date: NaiveDate,
    pub tps: f64,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub start_height: u64,
    pub end_height: u64,
}

/// Progress marker for the day being tallied.
///
/// Serialized as `{date, currentHeight, totalTransactions}`; the start boundary
/// fields are optional so older documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub date: NaiveDate,
    pub current_height: u64,
    pub total_transactions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,
}
