use menuannam::config::EmptyTermPolicy;
use menuannam::{CardFilter, CardStore, InsertOutcome, NewCard, StudySession};
use std::collections::HashSet;

async fn file_store(dir: &tempfile::TempDir) -> CardStore {
    let database_url = format!("sqlite:{}", dir.path().join("cards.db").display());
    CardStore::connect(&database_url)
        .await
        .expect("failed to open card store")
}

async fn seeded(store: &CardStore) {
    let outcomes = store
        .insert_many(&[
            NewCard::new("hello", "xin chào"),
            NewCard::new("hello world", "chào thế giới"),
            NewCard::new("thank you", "cảm ơn"),
            NewCard::new("goodbye", "tạm biệt"),
        ])
        .await
        .expect("seed insert failed");
    assert!(outcomes.iter().all(|o| o.id().is_some()));
}

#[tokio::test]
async fn hello_walkthrough() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let card = NewCard::new("hello", "xin chào");

    assert!(matches!(store.insert(&card).await, InsertOutcome::Inserted(_)));
    assert_eq!(store.count().await.unwrap(), 1);

    assert_eq!(store.insert(&card).await, InsertOutcome::Ignored);
    assert_eq!(store.count().await.unwrap(), 1);

    let found = store
        .get_filtered(&CardFilter::english("hello", true))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vietnamese.as_deref(), Some("xin chào"));

    let removed = store
        .delete_by_pair(Some("hello"), Some("xin chào"))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn insert_many_ignores_duplicates_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    let outcomes = store
        .insert_many(&[
            NewCard::new("one", "một"),
            NewCard::new("one", "một"),
            NewCard::new("two", "hai"),
        ])
        .await
        .unwrap();

    assert!(outcomes[0].id().is_some());
    assert_eq!(outcomes[1], InsertOutcome::Ignored);
    assert!(outcomes[2].id().is_some());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn deleting_unknown_pair_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    store.insert(&NewCard::new("test_english", "test_vietnamese")).await;

    let before = store.get_all().await.unwrap();
    let removed = store
        .delete_by_pair(Some("test_english_1"), Some("test_vietnamese_1"))
        .await
        .unwrap();
    let after = store.get_all().await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(before, after);
}

#[tokio::test]
async fn exact_and_partial_filters() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    seeded(&store).await;

    let exact = store
        .get_filtered(&CardFilter::english("hello", true))
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert!(exact.iter().all(|c| c.english.as_deref() == Some("hello")));

    let partial = store
        .get_filtered(&CardFilter::english("hello", false))
        .await
        .unwrap();
    assert_eq!(partial.len(), 2);
    assert!(partial.iter().all(|c| c.english.as_deref().unwrap().contains("hello")));

    let by_vietnamese = store
        .get_filtered(&CardFilter::vietnamese("chào", false))
        .await
        .unwrap();
    assert_eq!(by_vietnamese.len(), 2);

    let both = store
        .get_filtered(&CardFilter {
            english: "hello".to_string(),
            exact_english: false,
            vietnamese: "xin chào".to_string(),
            exact_vietnamese: true,
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
}

#[tokio::test]
async fn partial_filter_treats_like_wildcards_literally() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    seeded(&store).await;
    store.insert(&NewCard::new("100%", "một trăm phần trăm")).await;

    let found = store
        .get_filtered(&CardFilter::english("%", false))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].english.as_deref(), Some("100%"));
}

#[tokio::test]
async fn empty_term_matches_all_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    seeded(&store).await;

    let all = store.get_filtered(&CardFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);

    let exact_empty = store
        .get_filtered(&CardFilter::english("", true))
        .await
        .unwrap();
    assert_eq!(exact_empty.len(), 4);
}

#[tokio::test]
async fn empty_term_can_match_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir)
        .await
        .with_empty_term_policy(EmptyTermPolicy::MatchNone);
    seeded(&store).await;

    assert!(store.get_filtered(&CardFilter::default()).await.unwrap().is_empty());
    assert!(
        store
            .get_filtered(&CardFilter::english("hello", true))
            .await
            .unwrap()
            .is_empty()
    );
    let both = store
        .get_filtered(&CardFilter {
            english: "hello".to_string(),
            exact_english: true,
            vietnamese: "xin chào".to_string(),
            exact_vietnamese: true,
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
}

#[tokio::test]
async fn random_subset_draws_distinct_stored_cards() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    seeded(&store).await;

    let stored: HashSet<i64> = store.get_all().await.unwrap().iter().map(|c| c.id).collect();
    for _ in 0..10 {
        let drawn = store.get_random_subset(3).await.unwrap();
        let ids: HashSet<i64> = drawn.iter().map(|c| c.id).collect();
        assert_eq!(drawn.len(), 3);
        assert_eq!(ids.len(), 3);
        assert!(ids.is_subset(&stored));
    }

    assert_eq!(store.get_random_subset(10).await.unwrap().len(), 4);
    assert!(store.get_random_subset(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn updates_keep_identity() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let id = store
        .insert(&NewCard::new("cat", "con meo"))
        .await
        .id()
        .unwrap();

    let changed = store
        .update_by_pair(Some("cat"), Some("con meo"), Some("cat"), Some("con mèo"))
        .await
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        store.get_by_pair(Some("cat"), Some("con mèo")).await.unwrap().unwrap().id,
        id
    );

    assert_eq!(store.update_by_id(id, Some("kitten"), None).await.unwrap(), 1);
    let card = store.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(card.english.as_deref(), Some("kitten"));
    assert_eq!(card.display_vietnamese(), "N/A");

    assert_eq!(store.update_by_id(id + 100, Some("x"), Some("y")).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_by_id_and_missing_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let id = store.insert(&NewCard::new("dog", "con chó")).await.id().unwrap();

    assert!(store.delete_by_id(id).await.unwrap());
    assert!(!store.delete_by_id(id).await.unwrap());
    assert!(store.get_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let store = file_store(&dir).await;
        store.insert(&NewCard::new("sun", "mặt trời")).await.id().unwrap()
    };
    let store = file_store(&dir).await;
    let card = store.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(card.english.as_deref(), Some("sun"));
    assert_eq!(store.insert(&NewCard::new("sun", "mặt trời")).await, InsertOutcome::Ignored);
}

#[tokio::test]
async fn study_session_draws_lesson_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    seeded(&store).await;

    let session = StudySession::start(&store, 3).await.unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.progress(), "Card 1 of 3");
}
