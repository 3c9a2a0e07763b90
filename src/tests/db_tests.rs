#[cfg(test)]
mod tests {
    use crate::db::{connection, daily_tps};
    use crate::models::NewDailyTps;
    use crate::tests::date;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        connection::establish_connection("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database")
    }

    fn day(y: i32, m: u32, d: u32, tps: f64) -> NewDailyTps {
        NewDailyTps {
            date: date(y, m, d),
            tps,
            start_timestamp: 1_500_000_000,
            end_timestamp: 1_500_086_400,
            start_height: 1_300_000,
            end_height: 1_300_720,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_date() {
        let pool = setup().await;

        daily_tps::upsert_daily_tps(&pool, &day(2017, 7, 14, 0.05)).await.unwrap();
        let first = daily_tps::latest_daily_tps(&pool).await.unwrap().unwrap();

        daily_tps::upsert_daily_tps(&pool, &day(2017, 7, 14, 0.07)).await.unwrap();
        let second = daily_tps::latest_daily_tps(&pool).await.unwrap().unwrap();

        assert_eq!(daily_tps::count_daily_tps(&pool).await.unwrap(), 1);
        assert_eq!(second.tps, 0.07);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_bounded() {
        let pool = setup().await;
        for d in [3, 1, 2, 5] {
            daily_tps::upsert_daily_tps(&pool, &day(2018, 1, d, d as f64 / 100.0))
                .await
                .unwrap();
        }

        let all = daily_tps::list_daily_tps(&pool, None, None).await.unwrap();
        let dates: Vec<_> = all.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2018, 1, 1), date(2018, 1, 2), date(2018, 1, 3), date(2018, 1, 5)]
        );

        let window = daily_tps::list_daily_tps(&pool, Some(date(2018, 1, 2)), Some(date(2018, 1, 3)))
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].start_height, 1_300_000);
        assert_eq!(window[0].end_height, 1_300_720);

        let latest = daily_tps::latest_daily_tps(&pool).await.unwrap().unwrap();
        assert_eq!(latest.date, date(2018, 1, 5));
    }

    #[tokio::test]
    async fn test_empty_table_has_no_latest() {
        let pool = setup().await;
        assert!(daily_tps::latest_daily_tps(&pool).await.unwrap().is_none());
        assert!(daily_tps::list_daily_tps(&pool, None, None).await.unwrap().is_empty());
    }
}
