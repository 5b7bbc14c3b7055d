//! Staff flows over real HTTP against the mock backend.

#![cfg(feature = "runner")]

mod mock_backend;
mod support;

use hospital_display::api::http::HttpFetch;
use hospital_display::api::{ApiClient, ApiError};
use hospital_display::controllers::staff::{AlertForm, InventoryForm, StockOperation, TokenForm};
use hospital_display::controllers::{PageContext, StaffPage};
use hospital_display::lifecycle::Page;
use hospital_display::surface::Region;
use hospital_display::views::{AlertBoard, BannerKind, TokenStatus, View};
use mock_backend::MockBackend;
use serde_json::json;
use std::sync::Arc;
use support::Harness;

fn staff_against(backend: &MockBackend, h: &Harness) -> StaffPage {
    let fetch = HttpFetch::new(&backend.base_url()).unwrap();
    StaffPage::new(PageContext {
        api: ApiClient::new(Arc::new(fetch)),
        ..h.context()
    })
}

#[tokio::test]
async fn enqueue_then_advance_round_trip() {
    let backend = MockBackend::start().await;
    backend
        .set_tokens(json!({
            "current_tokens": {"cardiology": "C-12"},
            "queue": {"cardiology": []},
            "last_updated": "2026-10-16T08:50:00"
        }))
        .await;
    let h = Harness::new(Region::STAFF);
    let page = staff_against(&backend, &h);

    page.fill_token_form(TokenForm {
        department: "cardiology".to_string(),
        token_number: "C-13".to_string(),
    });
    let banner = page.add_token().await;
    assert_eq!(banner.kind, BannerKind::Success);

    let stored = backend.tokens().await;
    assert_eq!(stored["queue"]["cardiology"][0]["token_number"], "C-13");
    assert_eq!(stored["last_updated"], "2026-10-16T08:50:00");

    let banner = page.advance_token("cardiology").await.unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Advanced to token C-13");

    let Some(View::TokenStatus(TokenStatus::Rows(rows))) = h.surface.last(Region::TokenStatus)
    else {
        panic!("expected token rows");
    };
    assert_eq!(rows[0].current, "C-13");
    assert_eq!(rows[0].queue_length, 0);

    let banner = page.advance_token("cardiology").await.unwrap();
    assert_eq!(banner.kind, BannerKind::Info);
    assert_eq!(banner.message, "No tokens in queue");

    backend.stop().await;
}

#[tokio::test]
async fn alert_create_and_dismiss() {
    let backend = MockBackend::start().await;
    let h = Harness::new(Region::STAFF);
    let page = staff_against(&backend, &h);

    page.fill_alert_form(AlertForm {
        kind: "code_red".to_string(),
        message: "Smoke on level 2".to_string(),
        location: "Level 2".to_string(),
    });
    page.create_alert().await;
    assert_eq!(backend.active_alerts().await.len(), 1);
    let Some(View::Alerts(AlertBoard::Alerts(cards))) = h.surface.last(Region::Alerts) else {
        panic!("expected alert cards");
    };
    assert_eq!(cards[0].title, "CODE RED");

    let banner = page.dismiss_alert(1).await;
    assert_eq!(banner.message, "Alert dismissed successfully");
    assert!(backend.active_alerts().await.is_empty());

    // already gone on the backend side
    let banner = page.dismiss_alert(99).await;
    assert_eq!(banner.message, "Failed to dismiss alert");

    backend.stop().await;
}

#[tokio::test]
async fn inventory_update_persists_whole_document() {
    let backend = MockBackend::start().await;
    backend
        .set_inventory(json!({
            "medications": {
                "Insulin": {"quantity": 12, "unit": "vials", "min_threshold": 5, "max_capacity": 60}
            },
            "supplies": {
                "Syringes": {"quantity": 300, "unit": "pieces", "min_threshold": 50, "max_capacity": 1000, "category": "Consumables"}
            }
        }))
        .await;
    let h = Harness::new(Region::STAFF);
    let page = staff_against(&backend, &h);

    page.fill_inventory_form(InventoryForm {
        item_name: "Insulin".to_string(),
        quantity: 8,
        operation: StockOperation::Add,
    });
    let banner = page.update_inventory().await;
    assert_eq!(banner.message, "Inventory updated successfully");

    let stored = backend.inventory().await;
    assert_eq!(stored["medications"]["Insulin"]["quantity"], 20);
    assert_eq!(stored["supplies"]["Syringes"]["category"], "Consumables");

    backend.stop().await;
}

#[tokio::test]
async fn server_errors_surface_as_banners() {
    let backend = MockBackend::start().await;
    backend.set_failing(true).await;
    let h = Harness::new(Region::STAFF);
    let page = staff_against(&backend, &h);

    page.load_all().await;
    assert!(h.surface.last(Region::Messages).is_none());

    let banner = page.quick_alert(hospital_display::controllers::staff::QuickAlert::Emergency).await;
    assert_eq!(banner.kind, BannerKind::Danger);
    assert_eq!(banner.message, "Failed to create quick alert");

    let banner = page.advance_token("ent").await.unwrap();
    assert_eq!(banner.message, "Internal server error");

    backend.stop().await;
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let api = ApiClient::new(Arc::new(HttpFetch::new(&url).unwrap()));
    assert!(matches!(api.alerts().await, Err(ApiError::Transport(_))));
}
