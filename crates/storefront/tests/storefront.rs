//! Integration tests for the storefront router.
//!
//! Each test builds the real application (built-in catalog, in-memory
//! storage, real middleware stack) behind a cookie-persisting test
//! server, so per-client state behaves exactly as it does for a browser.

use axum::http::StatusCode;
use axum_test::TestServer;

use freshmart_storefront::config::FreshmartConfig;
use freshmart_storefront::routes;
use freshmart_storefront::state::AppState;

/// Build a test server with a fresh application instance.
fn server() -> TestServer {
    let config = FreshmartConfig::from_env().expect("default config must load");
    let state = AppState::new(config).expect("app state must build");

    TestServer::builder()
        .save_cookies()
        .build(routes::app(state))
        .expect("test server must start")
}

#[tokio::test]
async fn health_check_returns_ok() {
    let server = server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn home_page_renders_category_grid() {
    let server = server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("FreshMart"));
    assert!(body.contains("Shop by Category"));
}

#[tokio::test]
async fn category_pages_render_and_unknown_ids_are_404() {
    let server = server();

    server.get("/categories").await.assert_status_ok();

    let response = server.get("/categories/produce").await;
    response.assert_status_ok();
    assert!(response.text().contains("Fresh Produce"));

    let response = server.get("/categories/not-a-category").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Category not found"));
}

#[tokio::test]
async fn cart_flow_adds_updates_and_empties() {
    let server = server();

    // Add the same product twice; the badge should reach 2.
    let response = server
        .post("/cart/add")
        .form(&[("product_id", "p-milk")])
        .await;
    response.assert_status_ok();
    assert!(response.headers().get("HX-Trigger").is_some());

    server
        .post("/cart/add")
        .form(&[("product_id", "p-milk")])
        .await
        .assert_status_ok();

    let count = server.get("/cart/count").await;
    assert!(count.text().contains("2"));

    // The cart page shows the line and its total.
    let page = server.get("/cart").await;
    page.assert_status_ok();
    assert!(page.text().contains("Whole Milk"));
    assert!(page.text().contains("$7.98"));

    // Updating to zero removes the line entirely.
    let response = server
        .post("/cart/update")
        .form(&[("product_id", "p-milk"), ("quantity", "0")])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Your cart is empty"));

    let count = server.get("/cart/count").await;
    assert_eq!(count.text().trim(), "");
}

#[tokio::test]
async fn adding_unknown_product_is_404() {
    let server = server();

    let response = server
        .post("/cart/add")
        .form(&[("product_id", "p-not-in-catalog")])
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_requires_sign_in_and_then_clears_the_cart() {
    let server = server();

    server
        .post("/cart/add")
        .form(&[("product_id", "p-salmon")])
        .await
        .assert_status_ok();

    // Anonymous checkout redirects to sign-in and leaves the cart alone.
    let response = server.post("/cart/checkout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(location.starts_with("/auth/login"));
    assert!(server.get("/cart/count").await.text().contains("1"));

    // Mock sign-in, then checkout succeeds and empties the cart.
    let response = server
        .post("/auth/login")
        .form(&[("email", "dana@example.com"), ("password", "secret123")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let response = server.post("/cart/checkout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert_eq!(location, "/?ordered=1");

    assert_eq!(server.get("/cart/count").await.text().trim(), "");
}

#[tokio::test]
async fn login_rejects_short_passwords() {
    let server = server();

    let response = server
        .post("/auth/login")
        .form(&[("email", "dana@example.com"), ("password", "short")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(location.contains("error=credentials"));
}

#[tokio::test]
async fn category_visits_personalize_the_home_page() {
    let server = server();

    // A fresh client sees seed order: produce first.
    let body = server.get("/").await.text();
    let produce = body.find("Fresh Produce").expect("produce tile");
    let frozen = body.find("Frozen Foods");
    assert!(frozen.is_none_or(|frozen| produce < frozen));

    // Browsing the frozen aisle twice outranks everything else.
    server.get("/categories/frozen").await.assert_status_ok();
    server.get("/categories/frozen").await.assert_status_ok();

    let body = server.get("/").await.text();
    let frozen = body.find("Frozen Foods").expect("frozen tile");
    let produce = body.find("Fresh Produce").expect("produce tile");
    assert!(frozen < produce);
}

#[tokio::test]
async fn tile_clicks_are_recorded() {
    let server = server();

    let response = server
        .post("/track/category")
        .form(&[("category_id", "bakery")])
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn meal_planner_outage_degrades_to_a_friendly_message() {
    // The default planner URL points at a service that is not running
    // in tests, so the request fails fast with a connection error.
    let server = server();

    let response = server
        .post("/plan-meal")
        .form(&[
            ("dish", "paneer butter masala"),
            ("servings", "2"),
            ("appetite", "normal"),
        ])
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("unavailable"));
    assert_eq!(server.get("/cart/count").await.text().trim(), "");
}

#[tokio::test]
async fn plan_meal_requires_a_dish() {
    let server = server();

    let response = server.post("/plan-meal").form(&[("dish", "  ")]).await;

    response.assert_status_ok();
    assert!(response.text().contains("which dish"));
}
