//! Integration tests for Products domain
//!
//! These tests use real MongoDB via testcontainers to ensure:
//! - Documents round-trip through the driver
//! - Partial updates only `$set` the supplied fields
//! - The conditional stock update holds under concurrency
//!
//! They need a Docker daemon: `cargo test -p domain_products -- --ignored`

use domain_products::*;
use futures_util::future::join_all;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

fn phone(builder: &TestDataBuilder, stock: i64) -> NewProduct {
    NewProduct {
        name: builder.name("phone", "main"),
        brand: "Fairphone".to_string(),
        stock,
        price: builder.price(),
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_create_and_get_product() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let created = repo.create(phone(&builder, 4)).await.unwrap();
    let retrieved = assert_some(
        repo.get_by_id(created.id).await.unwrap(),
        "product should exist",
    );

    assert_eq!(retrieved, created);
    assert_price_eq(retrieved.price, builder.price(), "price");
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_update_sets_only_supplied_fields() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("partial_update");

    let created = repo.create(phone(&builder, 10)).await.unwrap();

    // A sale lands between the read and the update
    repo.adjust_stock(created.id, 0, 3).await.unwrap();

    let updated = assert_some(
        repo.update(
            created.id,
            UpdateProduct {
                brand: Some("Fairphone B.V.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap(),
        "update should match",
    );

    assert_eq!(updated.brand, "Fairphone B.V.");
    assert_eq!(updated.stock, 7);
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_list_and_delete_all() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("delete_all");

    let first = repo.create(phone(&builder, 1)).await.unwrap();
    let second = repo.create(phone(&builder, 2)).await.unwrap();

    let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    assert_eq!(repo.delete_all().await.unwrap(), 2);
    assert_eq!(repo.delete_all().await.unwrap(), 0);
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_adjust_stock_outcomes() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("adjust_outcomes");

    let created = repo.create(phone(&builder, 7)).await.unwrap();

    match repo.adjust_stock(created.id, 3, 5).await.unwrap() {
        StockAdjustment::Applied(product) => assert_eq!(product.stock, 5),
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(
        repo.adjust_stock(created.id, 0, 6).await.unwrap(),
        StockAdjustment::Insufficient { available: 5 }
    );

    repo.delete(created.id).await.unwrap();
    assert_eq!(
        repo.adjust_stock(created.id, 0, 1).await.unwrap(),
        StockAdjustment::Missing
    );
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_adjust_stock_overflow_writes_nothing() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("adjust_overflow");

    let created = repo.create(phone(&builder, i64::MAX - 1)).await.unwrap();

    let err = repo.adjust_stock(created.id, 3, 1).await.unwrap_err();
    assert!(matches!(err, ProductError::StockOverflow { added: 2, .. }));

    let stored = assert_some(repo.get_by_id(created.id).await.unwrap(), "product");
    assert_eq!(stored.stock, i64::MAX - 1);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires Docker"]
async fn test_concurrent_reservations_never_oversell() {
    let mongo = TestMongo::new().await;
    let repo = MongoProductRepository::new(mongo.database());
    let builder = TestDataBuilder::from_test_name("concurrent_reserve");

    const TASKS: i64 = 20;
    let created = repo.create(phone(&builder, TASKS - 1)).await.unwrap();

    let handles = (0..TASKS).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.adjust_stock(created.id, 0, 1).await })
    });
    let outcomes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let applied = outcomes
        .iter()
        .filter(|o| matches!(o, StockAdjustment::Applied(_)))
        .count();
    let refused = outcomes
        .iter()
        .filter(|o| matches!(o, StockAdjustment::Insufficient { available: 0 }))
        .count();

    assert_eq!(applied as i64, TASKS - 1);
    assert_eq!(refused, 1);

    let stored = assert_some(repo.get_by_id(created.id).await.unwrap(), "product");
    assert_eq!(stored.stock, 0);
}
