//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use freshmart_core::Category;

use crate::filters;
use crate::middleware::ClientStorage;
use crate::state::AppState;
use crate::stores::UsageTracker;

/// Number of category tiles on the home page.
const HOME_CATEGORY_COUNT: usize = 6;

/// Category display data for tile grids.
#[derive(Clone)]
pub struct CategoryTileView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub product_count: usize,
}

impl From<&Category> for CategoryTileView {
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

/// Query parameters for the post-checkout banner.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub ordered: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Top categories for this client, ranked by recorded usage.
    pub categories: Vec<CategoryTileView>,
    /// Show the order-placed banner after checkout.
    pub ordered: bool,
}

/// Display the home page.
///
/// The category grid is personalized: categories the client has
/// interacted with most (see [`crate::stores::usage::weights`]) rise to
/// the top; new clients see seed-file order.
#[instrument(skip(state, storage))]
pub async fn home(
    State(state): State<AppState>,
    ClientStorage(storage): ClientStorage,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let usage = UsageTracker::open(storage);
    let categories = state
        .catalog()
        .ranked_categories(usage.map())
        .into_iter()
        .take(HOME_CATEGORY_COUNT)
        .map(CategoryTileView::from)
        .collect();

    HomeTemplate {
        categories,
        ordered: query.ordered.is_some(),
    }
}
