//! Image serving endpoint.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use itemshelf_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::images::ImageLookup;

/// GET /images/{filename}
///
/// Unknown names fall back to the configured default image.
pub async fn get_image(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let lookup = ctx.images.resolve(&filename).inspect_err(|e| {
        tracing::warn!(filename = %filename, error = %e, "Rejected image path");
    })?;

    let path = match lookup {
        ImageLookup::Found(path) => path,
        ImageLookup::Missing(_) => {
            tracing::debug!(filename = %filename, "Image not found, serving default");
            ctx.images.default_image_path()
        }
    };

    let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::not_found("image", &filename),
        _ => Error::from(e),
    })?;
    tracing::info!(path = %path.display(), bytes = data.len(), "Image served");

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], data).into_response())
}
