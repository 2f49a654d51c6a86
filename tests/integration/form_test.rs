//! Create form integration tests.

mod helpers;

use std::sync::Arc;

use kyarafit_core::AppError;
use kyarafit_core::config::StoreConfig;
use kyarafit_core::error::ErrorKind;
use kyarafit_core::traits::StaticSession;
use kyarafit_entity::CreatePiece;
use kyarafit_store::CreateForm;

use helpers::{ScriptedApi, TOKEN, piece};

fn form(api: &Arc<ScriptedApi>, token: Option<&str>) -> CreateForm {
    CreateForm::new(api.clone(), Arc::new(StaticSession::from_token(token)))
}

#[tokio::test]
async fn test_blank_name_makes_no_request() {
    let api = ScriptedApi::with_pieces(Vec::new());
    let mut form = form(&api, Some(TOKEN));
    form.set_name("   ");
    form.add_tag("magic");

    let err = form.submit().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(api.create_calls(), 0);
    assert_eq!(form.draft().tags, vec!["magic"]);
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let api = ScriptedApi::with_pieces(Vec::new());
    let mut form = form(&api, None);
    form.set_name("Magic Wand");

    let err = form.submit().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(api.create_calls(), 0);
}

#[tokio::test]
async fn test_submit_prepends_to_store_and_clears_draft() {
    let api = ScriptedApi::with_pieces(vec![
        piece("p-1", "Pink Wig", "wig", 30),
        piece("p-2", "School Dress", "dress", 20),
    ]);
    let store = helpers::store(&api, Some(TOKEN), StoreConfig::default());
    store.mount().await;

    let mut form = form(&api, Some(TOKEN)).with_store(store.clone());
    form.set_name("Magic Wand");
    form.set_category("prop");
    form.add_tag("magic");
    form.add_tag("sparkly");
    form.set_price("25.50");
    form.set_purchase_date("2024-01-13").unwrap();

    let created = form.submit().await.unwrap();
    assert_eq!(created.name, "Magic Wand");
    assert_eq!(created.category.as_deref(), Some("prop"));
    assert_eq!(created.tags, vec!["magic", "sparkly"]);
    assert_eq!(created.price, Some(25.5));
    assert_eq!(form.draft(), &CreatePiece::default());
    assert!(form.last_error().is_none());

    let state = store.snapshot();
    assert_eq!(state.items[0], created);
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.total, 3);
    // Local insert, no refetch.
    assert_eq!(api.list_calls(), 1);
}

#[tokio::test]
async fn test_prepend_ignores_active_criteria() {
    let api = ScriptedApi::with_pieces(vec![piece("p-1", "Pink Wig", "wig", 30)]);
    let store = helpers::store(&api, Some(TOKEN), StoreConfig::default());
    store
        .set_criteria(kyarafit_core::types::QueryCriteria::default().category(Some("wig")))
        .await;

    let mut form = form(&api, Some(TOKEN)).with_store(store.clone());
    form.set_name("Magic Wand");
    form.set_category("prop");
    form.submit().await.unwrap();

    assert_eq!(store.snapshot().items[0].name, "Magic Wand");
}

#[tokio::test]
async fn test_backend_failure_keeps_draft_for_retry() {
    let api = ScriptedApi::with_pieces(Vec::new());
    let mut form = form(&api, Some(TOKEN));
    form.set_name("Magic Wand");
    form.add_tag("magic");

    api.fail_next_create(AppError::server("database unavailable (HTTP 500)"));
    let err = form.submit().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(form.last_error(), Some(&err));
    assert_eq!(form.draft().name, "Magic Wand");
    assert_eq!(form.draft().tags, vec!["magic"]);

    // Retry with the same draft succeeds.
    let created = form.submit().await.unwrap();
    assert_eq!(created.tags, vec!["magic"]);
    assert_eq!(api.create_calls(), 2);
}

#[tokio::test]
async fn test_remove_tag_removes_every_match() {
    let api = ScriptedApi::with_pieces(Vec::new());
    let mut form = form(&api, Some(TOKEN));
    form.add_tag("magic");
    form.add_tag("sparkly");
    form.add_tag("magic");
    assert_eq!(form.draft().tags, vec!["magic", "sparkly"]);

    assert_eq!(form.remove_tag("magic"), 1);
    assert_eq!(form.draft().tags, vec!["sparkly"]);
    assert_eq!(form.remove_tag("magic"), 0);
}

#[tokio::test]
async fn test_invalid_fields_rejected_locally() {
    let api = ScriptedApi::with_pieces(Vec::new());
    let mut form = form(&api, Some(TOKEN));
    form.set_name("Magic Wand");
    form.set_source_link("not a link");

    let err = form.submit().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(api.create_calls(), 0);

    form.set_source_link("https://shop.example.com/wand");
    form.set_price("-5");
    assert_eq!(form.submit().await.unwrap_err().kind, ErrorKind::Validation);

    form.set_price("5");
    assert!(form.submit().await.is_ok());
}
