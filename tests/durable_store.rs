//! PostgreSQL document store behaviour, alone and behind the coordinator.

mod helpers;

use helpers::{CountingCache, epl_2020, make_standing, serie_a_2020};
use sqlx::PgPool;
use standings::storage::{
    DurableStore, Key, PgDocumentStore, StandingsStorage, StoreOutcome, TieredStorage,
};
use std::sync::Arc;
use std::time::Duration;

async fn document_count(pool: &PgPool, key: &Key) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM standings_documents WHERE key = $1")
        .bind(key.storage_key())
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn written_document_reads_back(pool: PgPool) {
    let store = PgDocumentStore::from_pool(pool.clone());
    let key = Key::new("seriea", "2020");

    assert!(store.read(&key).await.unwrap().is_none());

    store.write(&key, &serie_a_2020()).await.unwrap();

    assert_eq!(store.read(&key).await.unwrap(), Some(serie_a_2020()));
    assert!(store.read(&Key::new("seriea", "2019")).await.unwrap().is_none());
    assert_eq!(document_count(&pool, &key).await, 1);
}

#[sqlx::test]
async fn earliest_document_wins(pool: PgPool) {
    let store = PgDocumentStore::from_pool(pool.clone());
    let key = Key::new("epl", "2020");
    let mut revised = epl_2020();
    revised.add(make_standing(3, "Liverpool", 69, 68, 42));

    store.write(&key, &epl_2020()).await.unwrap();
    store.write(&key, &revised).await.unwrap();

    assert_eq!(document_count(&pool, &key).await, 2);
    assert_eq!(store.read(&key).await.unwrap(), Some(epl_2020()));
}

#[sqlx::test]
async fn identical_store_twice_leaves_one_document(pool: PgPool) {
    let cache = CountingCache::new();
    let storage = TieredStorage::new(
        cache.clone(),
        Arc::new(PgDocumentStore::from_pool(pool.clone())),
        Duration::from_secs(5),
    );
    let key = Key::new("epl", "2020");

    let first = storage.store(&key, &epl_2020()).await.unwrap();
    let second = storage.store(&key, &epl_2020()).await.unwrap();

    assert_eq!(first, StoreOutcome::Created);
    assert_eq!(second, StoreOutcome::CacheRepaired);
    assert_eq!(document_count(&pool, &key).await, 1);
    assert_eq!(cache.peek(&key), Some(epl_2020()));
    assert_eq!(storage.check_and_get(&key).await.unwrap(), Some(epl_2020()));
}

#[sqlx::test]
async fn durable_hit_promoted_after_cache_loss(pool: PgPool) {
    let store = PgDocumentStore::from_pool(pool);
    let key = Key::new("seriea", "2020");
    store.write(&key, &serie_a_2020()).await.unwrap();

    let cache = CountingCache::new();
    let storage = TieredStorage::new(cache.clone(), Arc::new(store), Duration::from_secs(5));

    assert_eq!(storage.check_and_get(&key).await.unwrap(), Some(serie_a_2020()));
    assert_eq!(cache.peek(&key), Some(serie_a_2020()));
}
