use crate::models::{DailyTpsRecord, NewDailyTps};
use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Sqlite};

/// Insert the day's figures, or replace them if the date is already stored.
/// `created_at` survives the replacement.
pub async fn upsert_daily_tps(pool: &Pool<Sqlite>, day: &NewDailyTps) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let start_height = day.start_height as i64;
    let end_height = day.end_height as i64;

    sqlx::query(
        r#"
        INSERT INTO daily_tps
        (date, tps, start_timestamp, end_timestamp, start_height, end_height, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            tps = excluded.tps,
            start_timestamp = excluded.start_timestamp,
            end_timestamp = excluded.end_timestamp,
            start_height = excluded.start_height,
            end_height = excluded.end_height,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(day.date)
    .bind(day.tps)
    .bind(day.start_timestamp)
    .bind(day.end_timestamp)
    .bind(start_height)
    .bind(end_height)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Stored days in ascending date order, optionally bounded on either side (inclusive).
pub async fn list_daily_tps(
    pool: &Pool<Sqlite>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DailyTpsRecord>, sqlx::Error> {
    sqlx::query_as::<_, DailyTpsRecord>(
        r#"SELECT date, tps, start_timestamp, end_timestamp, start_height, end_height,
                  created_at, updated_at
           FROM daily_tps
           WHERE (?1 IS NULL OR date >= ?1)
           AND (?2 IS NULL OR date <= ?2)
           ORDER BY date ASC"#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn latest_daily_tps(pool: &Pool<Sqlite>) -> Result<Option<DailyTpsRecord>, sqlx::Error> {
    sqlx::query_as::<_, DailyTpsRecord>(
        r#"SELECT date, tps, start_timestamp, end_timestamp, start_height, end_height,
                  created_at, updated_at
           FROM daily_tps
           ORDER BY date DESC
           LIMIT 1"#,
    )
    .fetch_optional(pool)
    .await
}

pub async fn count_daily_tps(pool: &Pool<Sqlite>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM daily_tps")
        .fetch_one(pool)
        .await
}
