//! Filter controller integration tests, run on paused time.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use kyarafit_core::config::StoreConfig;
use kyarafit_store::{FetchStatus, FilterController, PieceStore};
use tokio::time::sleep;

use helpers::{ScriptedApi, TOKEN, piece};

const DEBOUNCE: Duration = Duration::from_millis(300);

fn setup() -> (Arc<ScriptedApi>, Arc<PieceStore>, FilterController) {
    let api = ScriptedApi::with_pieces(vec![
        piece("p-1", "Pink Wig", "wig", 30),
        piece("p-2", "School Dress", "dress", 20),
        piece("p-3", "Silver Wig", "wig", 10),
    ]);
    let store = helpers::store(&api, Some(TOKEN), StoreConfig::default());
    let filter = FilterController::with_debounce(store.clone(), DEBOUNCE);
    (api, store, filter)
}

async fn settled(store: &PieceStore) {
    let mut rx = store.subscribe();
    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.status == FetchStatus::Idle),
    )
    .await
    .expect("store settled")
    .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_keystrokes_collapse_into_one_fetch() {
    let (api, store, filter) = setup();

    filter.set_search("w");
    sleep(Duration::from_millis(100)).await;
    filter.set_search("wi");
    sleep(Duration::from_millis(100)).await;
    filter.set_search("wig");
    sleep(Duration::from_millis(250)).await;
    assert_eq!(api.list_calls(), 0);
    assert_eq!(filter.search_query(), "wig");

    sleep(Duration::from_millis(100)).await;
    settled(&store).await;
    assert_eq!(api.searches(), vec![Some("wig".to_string())]);
    assert_eq!(store.snapshot().items.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clear_search_is_immediate_and_cancels_pending() {
    let (api, store, filter) = setup();

    filter.set_search("dress");
    filter.clear_search();
    filter.flush().await;
    settled(&store).await;
    assert_eq!(api.searches(), vec![None]);
    assert_eq!(filter.search_query(), "");

    // The cancelled keystroke never fires.
    sleep(DEBOUNCE * 3).await;
    assert_eq!(api.list_calls(), 1);
    assert_eq!(store.snapshot().items.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_blank_search_text_counts_as_clear() {
    let (api, store, filter) = setup();

    filter.set_search("   ");
    filter.flush().await;
    settled(&store).await;
    assert_eq!(api.list_calls(), 1);
    assert!(store.criteria().search.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_category_applies_immediately_with_pending_search() {
    let (api, store, filter) = setup();

    filter.set_search("pink");
    filter.select_category(Some("Wig"));
    filter.flush().await;
    settled(&store).await;

    let seen = api.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].search.as_deref(), Some("pink"));
    assert_eq!(seen[0].category.as_deref(), Some("wig"));
    assert_eq!(filter.selected_category().as_deref(), Some("wig"));
    assert_eq!(store.snapshot().items.len(), 1);

    filter.select_category(Some("all"));
    filter.flush().await;
    settled(&store).await;
    assert_eq!(filter.selected_category(), None);
    assert!(store.criteria().category.is_none());
    assert_eq!(api.list_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_flush_applies_pending_search_now() {
    let (api, store, filter) = setup();

    filter.set_search("dress");
    filter.flush().await;
    settled(&store).await;
    assert_eq!(api.searches(), vec![Some("dress".to_string())]);

    // Nothing is left to fire later.
    sleep(DEBOUNCE * 2).await;
    assert_eq!(api.list_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_old_search_never_overwrites_new_one() {
    let (api, store, filter) = setup();
    let wig_gate = api.gate("wig");

    filter.set_search("wig");
    filter.flush().await;
    filter.set_search("dress");
    filter.flush().await;
    settled(&store).await;
    assert_eq!(store.snapshot().items[0].name, "School Dress");

    wig_gate.notify_one();
    sleep(Duration::from_millis(10)).await;
    let state = store.snapshot();
    assert_eq!(state.criteria.search.as_deref(), Some("dress"));
    assert_eq!(state.items.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_drops_pending_search() {
    let (api, _store, filter) = setup();

    filter.set_search("wig");
    tokio::task::yield_now().await;
    filter.shutdown();
    sleep(DEBOUNCE * 2).await;
    assert_eq!(api.list_calls(), 0);
}
