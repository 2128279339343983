//! Meal-planning route handlers.
//!
//! The "plan a meal" dialog posts a dish description to the external
//! planner service and pours the resulting ingredient list into the
//! cart. The contract with the planner is deliberately loose: items the
//! catalog cannot resolve are skipped, quantities below 1 are treated as
//! 1, and a planner failure leaves whatever was already added in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::middleware::ClientStorage;
use crate::services::planner::{Appetite, PlannedItem};
use crate::state::AppState;
use crate::stores::{CartStore, KeyValueStore};

/// Plan-a-meal form data.
#[derive(Debug, Deserialize)]
pub struct PlanMealForm {
    pub dish: String,
    pub servings: Option<u32>,
    pub appetite: Option<String>,
}

/// Plan-a-meal dialog fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/plan_meal.html")]
pub struct PlanMealDialogTemplate {}

/// Plan result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/plan_result.html")]
pub struct PlanResultTemplate {
    pub message: String,
    pub success: bool,
}

/// Outcome of applying a planned ingredient list to a cart.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlanOutcome {
    /// Units added across all resolved products.
    pub added_units: u32,
    /// Planned items resolved against the catalog.
    pub matched: usize,
    /// Planned items whose product id the catalog does not know.
    pub skipped: usize,
}

/// Apply a planned ingredient list to the cart.
///
/// Each resolved product is added `max(1, quantity)` times through the
/// normal add path, so line merging and persistence behave exactly as if
/// the shopper had clicked the button that many times. Unresolvable
/// product ids are skipped without aborting the remainder.
pub fn apply_plan<S: KeyValueStore>(
    catalog: &Catalog,
    store: &mut CartStore<S>,
    items: &[PlannedItem],
) -> PlanOutcome {
    let mut outcome = PlanOutcome::default();

    for item in items {
        let Some(product) = catalog.product(&item.product_id) else {
            tracing::warn!(product_id = %item.product_id, "planner returned unknown product, skipping");
            outcome.skipped += 1;
            continue;
        };

        let quantity = u32::try_from(item.quantity.max(1)).unwrap_or(1);
        for _ in 0..quantity {
            store.add_to_cart(product);
        }
        outcome.matched += 1;
        outcome.added_units += quantity;
    }

    outcome
}

/// Display the plan-a-meal dialog (HTMX).
#[instrument]
pub async fn dialog() -> impl IntoResponse {
    PlanMealDialogTemplate {}
}

/// Run the planner and fill the cart (HTMX).
///
/// Failures never bubble past this handler: the fragment reports a
/// generic message and the cart keeps whatever was applied before the
/// failure.
#[instrument(skip(state, storage, form))]
pub async fn submit(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Form(form): Form<PlanMealForm>,
) -> Response {
    let dish = form.dish.trim();
    if dish.is_empty() {
        return PlanResultTemplate {
            message: "Tell us which dish to plan first.".to_owned(),
            success: false,
        }
        .into_response();
    }

    let servings = form.servings.unwrap_or(2).max(1);
    let appetite = form
        .appetite
        .as_deref()
        .map(Appetite::from_form)
        .unwrap_or_default();

    let items = match state.planner().plan_meal(dish, servings, appetite).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("meal planning failed: {e}");
            return PlanResultTemplate {
                message: "Meal planning is unavailable right now. Please try again.".to_owned(),
                success: false,
            }
            .into_response();
        }
    };

    if items.is_empty() {
        return PlanResultTemplate {
            message: "No matching items were found for this dish.".to_owned(),
            success: false,
        }
        .into_response();
    }

    let mut store = CartStore::open(storage);
    let outcome = apply_plan(state.catalog(), &mut store, &items);

    if outcome.matched == 0 {
        return PlanResultTemplate {
            message: "None of the suggested items are available right now.".to_owned(),
            success: false,
        }
        .into_response();
    }

    let message = format!(
        "Added {} item{} to your cart.",
        outcome.added_units,
        if outcome.added_units == 1 { "" } else { "s" }
    );
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        PlanResultTemplate {
            message,
            success: true,
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use freshmart_core::ProductId;

    const CATALOG: &str = r#"{
        "categories": [
            {"id": "produce", "name": "Produce", "image": "/static/images/produce.jpg", "description": ""}
        ],
        "products": [
            {"id": "p1", "name": "Paneer", "price": "4.25", "image": "/static/images/paneer.jpg", "category": "produce", "unit": "pack", "description": "", "in_stock": true},
            {"id": "p2", "name": "Butter", "price": "3.10", "image": "/static/images/butter.jpg", "category": "produce", "unit": "stick", "description": "", "in_stock": true}
        ]
    }"#;

    fn planned(id: &str, quantity: i64) -> PlannedItem {
        PlannedItem {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_unknown_products_are_skipped_without_aborting() {
        let catalog = Catalog::from_json(CATALOG).expect("valid catalog");
        let mut store = CartStore::open(MemoryStore::new());

        let outcome = apply_plan(
            &catalog,
            &mut store,
            &[planned("p1", 2), planned("missing", 1), planned("p2", 1)],
        );

        assert_eq!(
            outcome,
            PlanOutcome {
                added_units: 3,
                matched: 2,
                skipped: 1,
            }
        );
        assert_eq!(
            store
                .cart()
                .line(&ProductId::new("p1"))
                .map(|l| l.quantity),
            Some(2)
        );
        assert_eq!(store.total_items(), 3);
    }

    #[test]
    fn test_quantities_below_one_are_raised_to_one() {
        let catalog = Catalog::from_json(CATALOG).expect("valid catalog");
        let mut store = CartStore::open(MemoryStore::new());

        apply_plan(&catalog, &mut store, &[planned("p1", 0), planned("p2", -4)]);

        assert_eq!(store.total_items(), 2);
    }

    #[test]
    fn test_planned_items_merge_with_existing_lines() {
        let catalog = Catalog::from_json(CATALOG).expect("valid catalog");
        let mut store = CartStore::open(MemoryStore::new());
        let paneer = catalog.product(&ProductId::new("p1")).expect("seeded");
        store.add_to_cart(paneer);

        apply_plan(&catalog, &mut store, &[planned("p1", 2)]);

        assert_eq!(store.cart().lines().len(), 1);
        assert_eq!(store.total_items(), 3);
    }
}
