// Integration tests for Stockroom
use chrono::{Duration, Utc};
use rand::prelude::*;
use std::sync::Arc;
use stockroom_api::AppState;
use stockroom_core::{CatalogItem, InteractionType, NewProduct, Recommender, RecommenderConfig};
use stockroom_storage::StorageManager;

fn recommender() -> Recommender {
    Recommender::new(RecommenderConfig::default())
}

fn random_catalog(rng: &mut StdRng, size: usize) -> Vec<CatalogItem> {
    let categories = ["cement", "steel", "lumber", "plumbing", "tools", "safety"];
    let words = ["bag", "beam", "pipe", "drill", "glove", "12 inch", "4x8", "rubber", "coated"];
    (0..size)
        .map(|i| {
            let category = categories[rng.random_range(0..categories.len())];
            let word = words[rng.random_range(0..words.len())];
            CatalogItem::new(format!("p{}", i), format!("{} {}", word, category), category, rng.random_range(0.0..200.0))
        })
        .collect()
}

#[test]
fn test_cement_scenario() {
    let recommender = recommender();
    recommender.rebuild(vec![
        CatalogItem::new("a", "Portland cement", "cement", 10.0),
        CatalogItem::new("b", "Masonry cement", "cement", 12.0),
        CatalogItem::new("c", "Pine board", "lumber", 100.0),
    ]);

    let recs = recommender.recommend("a", 2);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].id, "b");
    assert_eq!(recs[1].id, "c");
    for rec in &recs {
        assert!((0.0..=1.0).contains(&rec.similarity_score));
    }
    assert!(recs[0].similarity_score > recs[1].similarity_score);
}

#[test]
fn test_identical_items_score_one() {
    let recommender = recommender();
    let twin = || CatalogItem::new("", "Copper pipe", "plumbing", 15.0).with_description("half inch");
    let mut a = twin();
    a.id = "a".to_string();
    let mut b = twin();
    b.id = "b".to_string();
    let index = recommender.rebuild(vec![a, b, CatalogItem::new("c", "Helmet", "safety", 30.0)]);

    assert_eq!(index.similarity(0, 1), 1.0);
    assert_eq!(index.similarity(1, 0), 1.0);
    assert_eq!(recommender.recommend("a", 1)[0].similarity_score, 1.0);
}

#[test]
fn test_matrix_properties_on_random_catalogs() {
    let mut rng = StdRng::seed_from_u64(7);
    let recommender = recommender();
    for size in [1, 2, 5, 25] {
        let index = recommender.rebuild(random_catalog(&mut rng, size));
        assert_eq!(index.len(), size);
        assert_eq!(index.ids().count(), size);
        for i in 0..size {
            assert_eq!(index.similarity(i, i), 1.0);
            for j in 0..size {
                assert_eq!(index.similarity(i, j), index.similarity(j, i));
            }
        }
        for id in index.ids() {
            for n in [0, 1, 3, size + 2] {
                let recs = index.recommend(id, n);
                assert_eq!(recs.len(), n.min(size - 1));
                assert!(recs.iter().all(|r| r.id != id));
            }
        }
    }
}

#[test]
fn test_empty_rebuild_and_unknown_ids() {
    let recommender = recommender();
    recommender.rebuild(vec![CatalogItem::new("a", "Drill", "tools", 80.0)]);
    assert!(recommender.recommend("zzz", 5).is_empty());
    assert!(recommender.recommend("a", 5).is_empty());

    recommender.rebuild(Vec::new());
    assert!(recommender.snapshot().is_empty());
    assert!(recommender.recommend("a", 5).is_empty());
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let catalog = random_catalog(&mut rng, 30);
    let recommender = recommender();

    let first = recommender.rebuild(catalog.clone());
    let second = recommender.rebuild(catalog);
    for id in first.ids() {
        assert_eq!(first.recommend(id, 5), second.recommend(id, 5));
    }
}

#[test]
fn test_personalized_fallback_prefers_weight_then_recency() {
    let t0 = Utc::now();
    let catalog = vec![
        CatalogItem::new("old-popular", "Saw", "tools", 30.0)
            .with_interaction("u1", InteractionType::Purchase, 4.0)
            .with_created_at(t0),
        CatalogItem::new("new-popular", "Drill", "tools", 90.0)
            .with_interaction("u2", InteractionType::AddToCart, 4.0)
            .with_created_at(t0 + Duration::seconds(10)),
        CatalogItem::new("plain", "Nails", "tools", 3.0).with_created_at(t0 + Duration::seconds(20)),
    ];
    let recommender = recommender();
    recommender.rebuild(catalog.clone());

    let recs = recommender.recommend_for_user("nobody", 3, &catalog).unwrap();
    let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["new-popular", "old-popular", "plain"]);
}

#[test]
fn test_storage_backed_service_flow() {
    let temp_dir = tempfile::tempdir().unwrap();
    let seed = temp_dir.path().join("seed.json");
    std::fs::write(
        &seed,
        serde_json::json!([
            { "name": "Portland cement", "category": "cement", "price": 10.0 },
            { "name": "Masonry cement", "category": "cement", "price": 12.0 },
            { "name": "Pine board", "category": "lumber", "price": 100.0,
              "user_id": "u1", "interaction_type": "view", "interaction_weight": 2.0 }
        ])
        .to_string(),
    )
    .unwrap();

    {
        let storage = Arc::new(StorageManager::new(temp_dir.path().join("data")).unwrap());
        assert_eq!(storage.import_json(&seed).unwrap(), 3);
        let state = AppState::new(storage.clone(), Arc::new(recommender()));
        assert_eq!(state.refresh().unwrap().len(), 3);

        let board = storage.create_product(NewProduct::new("Oak board", "lumber", 95.0)).unwrap();
        state.refresh().unwrap();
        let user_recs = state
            .recommender
            .recommend_for_user("u1", 2, storage.as_ref())
            .unwrap();
        assert_eq!(user_recs[0].id, board.id);
    }

    // restart: catalog persists, index is rebuilt from it
    let storage = Arc::new(StorageManager::new(temp_dir.path().join("data")).unwrap());
    let state = AppState::new(storage.clone(), Arc::new(recommender()));
    assert!(state.recommender.snapshot().is_empty());
    let index = state.refresh().unwrap();
    assert_eq!(index.len(), 4);

    let portland = storage
        .list_products()
        .unwrap()
        .into_iter()
        .find(|p| p.name == "Portland cement")
        .unwrap();
    let recs = state.recommender.recommend(&portland.id, 1);
    assert_eq!(recs[0].name, "Masonry cement");
}
