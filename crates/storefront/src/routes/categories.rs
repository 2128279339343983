//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use freshmart_core::{Category, CategoryId, Product};

use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;
use crate::stores::usage::weights;
use crate::stores::{CartStore, UsageTracker};

pub use super::home::CategoryTileView;

/// Product display data for category grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub unit: String,
    pub price: String,
    pub in_stock: bool,
    /// Quantity already in this client's cart, if any.
    pub cart_quantity: Option<u32>,
}

impl ProductCardView {
    fn new(product: &Product, cart_quantity: Option<u32>) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            unit: product.unit.clone(),
            price: product.price.display(),
            in_stock: product.in_stock,
            cart_quantity,
        }
    }
}

/// Category header display data.
#[derive(Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub product_count: usize,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            product_count: category.product_count,
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryTileView>,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategoryView,
    pub products: Vec<ProductCardView>,
}

/// Not-found page for unknown category ids.
#[derive(Template, WebTemplate)]
#[template(path = "categories/not_found.html")]
pub struct CategoryNotFoundTemplate {}

/// Tile-click tracking form data.
#[derive(Debug, Deserialize)]
pub struct TrackCategoryForm {
    pub category_id: CategoryId,
}

/// Display the category listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let categories = state
        .catalog()
        .categories()
        .iter()
        .map(CategoryTileView::from)
        .collect();

    CategoriesIndexTemplate { categories }
}

/// Display a category's products.
///
/// Records a category-visit usage event so the category gains prominence
/// on this client's home page.
#[instrument(skip(state, storage))]
pub async fn show(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Path(id): Path<CategoryId>,
) -> Response {
    let Some(category) = state.catalog().category(&id) else {
        return (StatusCode::NOT_FOUND, CategoryNotFoundTemplate {}).into_response();
    };

    let mut usage = UsageTracker::open(storage.clone());
    usage.record_category_usage(&id, weights::CATEGORY_VISIT);

    let cart_store = CartStore::open(storage);
    let products = state
        .catalog()
        .products_in(&id)
        .into_iter()
        .map(|product| {
            let cart_quantity = cart_store
                .cart()
                .line(&product.id)
                .map(|line| line.quantity);
            ProductCardView::new(product, cart_quantity)
        })
        .collect();

    CategoryShowTemplate {
        category: CategoryView::from(category),
        products,
    }
    .into_response()
}

/// Record a category tile click (HTMX, fire-and-forget).
#[instrument(skip(storage))]
pub async fn track(
    ClientStorage(storage): ClientStorage,
    Form(form): Form<TrackCategoryForm>,
) -> StatusCode {
    let mut usage = UsageTracker::open(storage);
    usage.record_category_usage(&form.category_id, weights::TILE_CLICK);
    StatusCode::NO_CONTENT
}
