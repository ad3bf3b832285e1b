use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;

use crate::routes;
use crate::{
    foss_tools::FossToolsCatalog, media_storage::MediaStorage, types::Environment,
    upload_policy::UploadAuthorizer,
};

/// Builds the application router with all dependencies attached
pub fn router(
    environment: Environment,
    media_storage: Arc<dyn MediaStorage>,
    foss_tools: Arc<FossToolsCatalog>,
) -> Router {
    let mut openapi = OpenApi::default();
    let authorizer = Arc::new(UploadAuthorizer::new(media_storage.clone()));

    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(media_storage))
        .layer(Extension(authorizer))
        .layer(Extension(foss_tools))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    media_storage: Arc<dyn MediaStorage>,
    foss_tools: Arc<FossToolsCatalog>,
) -> anyhow::Result<()> {
    let router = router(environment, media_storage, foss_tools)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(tower_http::timeout::TimeoutLayer::new(
            std::time::Duration::from_secs(5),
        ));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], Environment::port()?));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 podu started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
