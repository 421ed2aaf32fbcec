//! Unit tests for the key-value stores.

use super::*;

fn sqlite() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

mod sqlite_store_tests {
    use super::*;

    #[test]
    fn init_schema_creates_table() {
        let store = sqlite();
        let count: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn get_missing_key_is_none() {
        let store = sqlite();
        assert_eq!(store.get(WALLET_KEY).unwrap(), None);
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut store = sqlite();
        store.set(WALLET_KEY, "10").unwrap();
        store.set(WALLET_KEY, "60").unwrap();

        assert_eq!(store.get(WALLET_KEY).unwrap().as_deref(), Some("60"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn remove_deletes_key() {
        let mut store = sqlite();
        store.set(CART_KEY, "[]").unwrap();
        store.remove(CART_KEY).unwrap();
        assert_eq!(store.get(CART_KEY).unwrap(), None);

        // Removing again is not an error
        store.remove(CART_KEY).unwrap();
    }

    #[test]
    fn apply_writes_whole_batch() {
        let mut store = sqlite();
        store.set(CART_KEY, r#"[{"url":"a.com"}]"#).unwrap();

        store
            .apply(&[StoreWrite::set(WALLET_KEY, "5"), StoreWrite::remove(CART_KEY)])
            .unwrap();

        assert_eq!(store.get(WALLET_KEY).unwrap().as_deref(), Some("5"));
        assert_eq!(store.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn apply_rolls_back_on_failure() {
        let mut store = sqlite();
        store.set(WALLET_KEY, "30").unwrap();

        // Break the table so the second statement fails after the first succeeded
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER block_cart BEFORE DELETE ON kv_store
                 WHEN old.key = 'site_cart_v1'
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();
        store.set(CART_KEY, "[]").unwrap();

        let result = store.apply(&[StoreWrite::set(WALLET_KEY, "0"), StoreWrite::remove(CART_KEY)]);
        assert!(result.is_err());

        assert_eq!(store.get(WALLET_KEY).unwrap().as_deref(), Some("30"));
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("market.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.set(WALLET_KEY, "1").unwrap();

        assert!(path.exists());
    }
}

mod memory_store_tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        store.set(WALLET_KEY, "12.5").unwrap();
        assert_eq!(store.get(WALLET_KEY).unwrap().as_deref(), Some("12.5"));

        store.remove(WALLET_KEY).unwrap();
        assert_eq!(store.get(WALLET_KEY).unwrap(), None);
    }

    #[test]
    fn failing_key_rejects_writes() {
        let mut store = MemoryStore::new();
        store.fail_writes_to(CART_KEY);

        assert!(matches!(
            store.set(CART_KEY, "[]"),
            Err(StoreError::WriteRejected(key)) if key == CART_KEY
        ));
        assert!(store.set(WALLET_KEY, "1").is_ok());

        store.clear_failures();
        assert!(store.set(CART_KEY, "[]").is_ok());
    }

    #[test]
    fn failing_batch_writes_nothing() {
        let mut store = MemoryStore::new();
        store.set(WALLET_KEY, "30").unwrap();
        store.fail_writes_to(CART_KEY);

        let result = store.apply(&[StoreWrite::set(WALLET_KEY, "0"), StoreWrite::remove(CART_KEY)]);
        assert!(result.is_err());
        assert_eq!(store.get(WALLET_KEY).unwrap().as_deref(), Some("30"));
    }
}

#[test]
fn default_db_path_ends_with_market_db() {
    let path = default_db_path();
    assert!(path.ends_with("site_market/market.db"));
}
