use std::sync::Arc;

use axum::{Extension, Json};
use common_types::FossToolsResponse;

use crate::{foss_tools::FossToolsCatalog, types::AppError};

/// Lists the open-source tools the project is built with
pub async fn list_foss_tools(
    Extension(catalog): Extension<Arc<FossToolsCatalog>>,
) -> Result<Json<FossToolsResponse>, AppError> {
    Ok(Json(catalog.load().await?))
}
