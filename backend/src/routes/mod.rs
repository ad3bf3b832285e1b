mod docs;
mod foss_tools;
mod health;
mod images;
mod upload;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route("/api/upload", post(upload::create_upload))
        .api_route("/api/foss-tools", get(foss_tools::list_foss_tools))
        // Public image URLs are `{base_url}/{key}`, so this must stay last-resort
        .route("/{key}", axum::routing::get(images::serve_image))
}
