//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. The cart itself lives in the client's durable storage scope
//! (see [`crate::stores::CartStore`]); handlers open the store, apply
//! one mutation, and render a fragment from the result.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use freshmart_core::{Cart, Price, ProductId};

use crate::config::DeliveryConfig;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{ClientStorage, RequireAuth};
use crate::state::AppState;
use crate::stores::usage::weights;
use crate::stores::{CartStore, KeyValueStore, UsageTracker};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub unit: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    /// `None` means delivery is free for this order.
    pub delivery_fee: Option<String>,
    pub total: String,
    /// "Add $X more for free delivery" amount, when below the threshold.
    pub free_delivery_gap: Option<String>,
}

impl CartView {
    /// Build the order-summary view for `cart`.
    ///
    /// Delivery is free strictly above the configured threshold, and the
    /// gap hint appears strictly below it, matching the storefront's
    /// long-standing summary behavior (a subtotal exactly at the
    /// threshold pays the fee but sees no hint).
    #[must_use]
    pub fn from_cart(cart: &Cart, delivery: &DeliveryConfig) -> Self {
        let subtotal = cart.subtotal();
        let free = subtotal > delivery.free_threshold;
        let fee = if free { Price::ZERO } else { delivery.fee };
        let gap = (subtotal < delivery.free_threshold)
            .then(|| Price::new(delivery.free_threshold.amount() - subtotal.amount()));

        let items = cart
            .lines()
            .iter()
            .map(|line| CartItemView {
                id: line.product.id.to_string(),
                name: line.product.name.clone(),
                image: line.product.image.clone(),
                unit: line.product.unit.clone(),
                quantity: line.quantity,
                price: line.product.price.display(),
                line_price: line.line_total().display(),
            })
            .collect();

        Self {
            items,
            item_count: cart.total_items(),
            subtotal: subtotal.display(),
            delivery_fee: (!free).then(|| fee.display()),
            total: (subtotal + fee).display(),
            free_delivery_gap: gap.map(|p| p.display()),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn items_fragment<S: KeyValueStore>(state: &AppState, store: &CartStore<S>) -> Response {
    let cart = CartView::from_cart(store.cart(), &state.config().delivery);
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, storage))]
pub async fn show(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
) -> impl IntoResponse {
    let store = CartStore::open(storage);
    CartShowTemplate {
        cart: CartView::from_cart(store.cart(), &state.config().delivery),
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Also records the strongest usage signal for the product's category.
/// Returns the cart count badge with an HTMX trigger so other fragments
/// refresh themselves.
#[instrument(skip(state, storage))]
pub async fn add(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product = state
        .catalog()
        .product(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut store = CartStore::open(storage.clone());
    store.add_to_cart(product);

    let mut usage = UsageTracker::open(storage);
    usage.record_category_usage(&product.category, weights::CART_ADD);

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: store.total_items(),
        },
    )
        .into_response())
}

/// Update a cart line's quantity (HTMX).
///
/// Quantities of zero or less remove the line; unknown products are a
/// no-op. Either way the current cart fragment is returned.
#[instrument(skip(state, storage))]
pub async fn update(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let mut store = CartStore::open(storage);
    store.update_quantity(&form.product_id, form.quantity);
    items_fragment(&state, &store)
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, storage))]
pub async fn remove(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut store = CartStore::open(storage);
    store.remove_from_cart(&form.product_id);
    items_fragment(&state, &store)
}

/// Empty the cart (HTMX).
#[instrument(skip(state, storage))]
pub async fn clear(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
) -> Response {
    let mut store = CartStore::open(storage);
    store.clear_cart();
    items_fragment(&state, &store)
}

/// Get the cart count badge (HTMX).
#[instrument(skip(storage))]
pub async fn count(ClientStorage(storage): ClientStorage) -> impl IntoResponse {
    let store = CartStore::open(storage);
    CartCountTemplate {
        count: store.total_items(),
    }
}

/// Place the order.
///
/// Checkout needs a signed-in user: `RequireAuth` sends anonymous
/// clients to the login page with their cart untouched. A signed-in
/// checkout clears the cart and lands on the home page with a
/// confirmation banner. There is no payment step; order placement is a
/// mock like authentication.
#[instrument(skip(storage, user))]
pub async fn checkout(
    ClientStorage(storage): ClientStorage,
    RequireAuth(user): RequireAuth,
) -> Response {
    let mut store = CartStore::open(storage);
    if store.cart().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let items = store.total_items();
    store.clear_cart();
    tracing::info!(user = %user.id, items, "order placed");
    Redirect::to("/?ordered=1").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshmart_core::{CategoryId, Product};
    use rust_decimal::Decimal;

    fn delivery() -> DeliveryConfig {
        DeliveryConfig {
            free_threshold: Price::new(Decimal::new(50, 0)),
            fee: Price::new(Decimal::new(599, 2)),
        }
    }

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Test {id}"),
            price: Price::new(price),
            image: "/static/placeholder.svg".to_owned(),
            category: CategoryId::new("produce"),
            unit: "each".to_owned(),
            description: String::new(),
            in_stock: true,
        }
    }

    #[test]
    fn test_small_orders_pay_the_fee_and_see_the_gap() {
        let mut cart = Cart::new();
        cart.add(&product("p-milk", Decimal::new(399, 2)));

        let view = CartView::from_cart(&cart, &delivery());
        assert_eq!(view.subtotal, "$3.99");
        assert_eq!(view.delivery_fee.as_deref(), Some("$5.99"));
        assert_eq!(view.total, "$9.98");
        assert_eq!(view.free_delivery_gap.as_deref(), Some("$46.01"));
    }

    #[test]
    fn test_large_orders_ship_free() {
        let mut cart = Cart::new();
        let roast = product("p-roast", Decimal::new(2550, 2));
        cart.add(&roast);
        cart.set_quantity(&roast.id, 3);

        let view = CartView::from_cart(&cart, &delivery());
        assert_eq!(view.subtotal, "$76.50");
        assert_eq!(view.delivery_fee, None);
        assert_eq!(view.total, "$76.50");
        assert_eq!(view.free_delivery_gap, None);
    }

    #[test]
    fn test_threshold_exactly_pays_fee_without_hint() {
        let mut cart = Cart::new();
        cart.add(&product("p-bundle", Decimal::new(50, 0)));

        let view = CartView::from_cart(&cart, &delivery());
        assert_eq!(view.delivery_fee.as_deref(), Some("$5.99"));
        assert_eq!(view.free_delivery_gap, None);
    }

    #[test]
    fn test_empty_cart_view_is_zeroed() {
        let view = CartView::from_cart(&Cart::new(), &delivery());
        assert!(view.items.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "$0.00");
    }
}
