//! Tests for RateRepository against a real SQLite file.

#[cfg(test)]
mod tests {
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::rates::RateRepository;
    use chrono::{Days, NaiveDate};
    use ratekeeper_core::rates::{InstrumentQuote, RateStore, UpsertSummary};
    use std::sync::Arc;
    use tempfile::tempdir;

    /// Creates a repository over a migrated database in a temp dir.
    /// The temp dir is returned to keep it alive for the test.
    fn create_test_repository() -> (RateRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("rates.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (RateRepository::new(Arc::clone(&pool), writer), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quote(code: &str, day: NaiveDate, bid: f64, ask: f64) -> InstrumentQuote {
        InstrumentQuote::new(code, day, bid, ask)
    }

    #[tokio::test]
    async fn test_upsert_same_batch_twice_is_idempotent() {
        let (repo, _dir) = create_test_repository();
        let batch = vec![
            quote("USD", date(2024, 1, 2), 3.91, 3.99),
            quote("EUR", date(2024, 1, 2), 4.31, 4.40),
            quote("GOLD_gold", date(2024, 1, 2), 257.12, 257.12),
        ];

        let first = repo.upsert_batch(&batch).await.unwrap();
        let second = repo.upsert_batch(&batch).await.unwrap();

        assert_eq!(first, UpsertSummary { inserted: 3, updated: 0 });
        assert_eq!(second, UpsertSummary { inserted: 0, updated: 3 });
        assert_eq!(second.total(), 3);
        assert_eq!(repo.count(None).unwrap(), 3);

        let usd = repo.get_rate("USD", date(2024, 1, 2)).unwrap().unwrap();
        assert_eq!((usd.bid, usd.ask), (3.91, 3.99));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_values() {
        let (repo, _dir) = create_test_repository();
        repo.upsert_rate(&quote("USD", date(2024, 1, 2), 3.90, 3.98))
            .await
            .unwrap();

        let summary = repo
            .upsert_batch(&[
                quote("USD", date(2024, 1, 2), 3.92, 4.00),
                quote("USD", date(2024, 1, 3), 3.95, 4.03),
            ])
            .await
            .unwrap();

        assert_eq!(summary, UpsertSummary { inserted: 1, updated: 1 });
        let usd = repo.get_rate("USD", date(2024, 1, 2)).unwrap().unwrap();
        assert_eq!((usd.bid, usd.ask), (3.92, 4.00));
    }

    #[tokio::test]
    async fn test_duplicate_new_key_rolls_back_whole_batch() {
        let (repo, _dir) = create_test_repository();
        repo.upsert_rate(&quote("USD", date(2024, 1, 2), 3.90, 3.98))
            .await
            .unwrap();

        let result = repo
            .upsert_batch(&[
                quote("USD", date(2024, 1, 2), 9.99, 9.99),
                quote("EUR", date(2024, 1, 2), 4.31, 4.40),
                quote("EUR", date(2024, 1, 2), 4.32, 4.41),
            ])
            .await;

        let err = result.unwrap_err();
        assert!(err.is_duplicate_key(), "unexpected error: {}", err);

        // the update in the same batch was rolled back too
        let usd = repo.get_rate("USD", date(2024, 1, 2)).unwrap().unwrap();
        assert_eq!((usd.bid, usd.ask), (3.90, 3.98));
        assert!(repo.get_rate("EUR", date(2024, 1, 2)).unwrap().is_none());
        assert_eq!(repo.count(None).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_batch_rejects_existing_key() {
        let (repo, _dir) = create_test_repository();
        let inserted = repo
            .insert_batch(&[
                quote("USD", date(2024, 1, 2), 3.90, 3.98),
                quote("USD", date(2024, 1, 3), 3.91, 3.99),
            ])
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let result = repo
            .insert_batch(&[
                quote("USD", date(2024, 1, 4), 3.92, 4.00),
                quote("USD", date(2024, 1, 2), 3.93, 4.01),
            ])
            .await;

        assert!(result.unwrap_err().is_duplicate_key());
        assert!(repo.get_rate("USD", date(2024, 1, 4)).unwrap().is_none());
        assert_eq!(repo.count(Some("USD")).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_range_scan_is_inclusive_and_ordered() {
        let (repo, _dir) = create_test_repository();
        repo.upsert_batch(&[
            quote("USD", date(2024, 1, 5), 3.95, 4.03),
            quote("USD", date(2024, 1, 2), 3.90, 3.98),
            quote("USD", date(2024, 1, 10), 3.99, 4.07),
            quote("USD", date(2024, 1, 3), 3.91, 3.99),
            quote("EUR", date(2024, 1, 3), 4.31, 4.40),
        ])
        .await
        .unwrap();

        let rows = repo
            .get_rates_in_range("USD", date(2024, 1, 2), date(2024, 1, 5))
            .unwrap();

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.effective_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 5)]);
        assert!(rows.iter().all(|r| r.code == "USD"));

        assert!(repo
            .get_rates_in_range("CHF", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap()
            .is_empty());
        assert_eq!(repo.list_codes().unwrap(), vec!["EUR", "USD"]);
    }

    #[tokio::test]
    async fn test_batch_larger_than_one_chunk() {
        let (repo, _dir) = create_test_repository();
        let start = date(2020, 1, 1);
        let batch: Vec<InstrumentQuote> = (0..1_234u64)
            .map(|i| quote("USD", start.checked_add_days(Days::new(i)).unwrap(), 3.0, 3.1))
            .collect();

        let summary = repo.upsert_batch(&batch).await.unwrap();

        assert_eq!(summary.inserted, 1_234);
        assert_eq!(repo.count(Some("USD")).unwrap(), 1_234);
    }

    #[tokio::test]
    async fn test_empty_batches_are_no_ops() {
        let (repo, _dir) = create_test_repository();
        assert_eq!(repo.upsert_batch(&[]).await.unwrap(), UpsertSummary::default());
        assert_eq!(repo.insert_batch(&[]).await.unwrap(), 0);
        assert!(repo.get_rate("USD", date(2024, 1, 2)).unwrap().is_none());
    }
}
