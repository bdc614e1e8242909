//! Item route handlers.
//!
//! `POST /items` accepts either `multipart/form-data` (the `image` part holds
//! the file) or `application/x-www-form-urlencoded` (the `image` value itself
//! is the payload).

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::{Form, Json};
use itemshelf_core::{Error, Item, NewItem};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::images::image_file_name;

/// Leading bytes of every JPEG file (SOI marker plus the next marker byte).
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Image part of an add-item request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Parsed and validated add-item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    pub name: String,
    pub category: String,
    pub image: ImageUpload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItemResponse {
    pub message: String,
    pub item: Item,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetItemsResponse {
    pub items: Vec<Item>,
}

/// Whether the upload looks like a JPEG.
///
/// A file name decides when present; otherwise the leading bytes do.
pub fn looks_like_jpg(image: &ImageUpload) -> bool {
    match &image.file_name {
        Some(name) => name.ends_with(".jpg"),
        None => image.data.starts_with(&JPEG_MAGIC),
    }
}

/// Extract the add-item fields from a multipart or url-encoded body.
pub async fn parse_add_item_request(request: Request) -> Result<AddItemRequest, Error> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (name, category, image) = if is_multipart {
        read_multipart(request).await?
    } else {
        read_urlencoded(request).await?
    };

    let name = name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::validation("name is required"))?;
    let category = category
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::validation("category is required"))?;
    let image = image
        .filter(|i| !i.data.is_empty())
        .ok_or_else(|| Error::validation("image is required"))?;

    if !looks_like_jpg(&image) {
        return Err(Error::validation("image must be a .jpg file"));
    }

    Ok(AddItemRequest {
        name,
        category,
        image,
    })
}

/// Map an extractor rejection, keeping 413 for oversized bodies.
fn rejected(status: StatusCode, text: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(text)
    } else {
        Error::validation(text)
    }
}

type FormFields = (Option<String>, Option<String>, Option<ImageUpload>);

async fn read_multipart(request: Request) -> Result<FormFields, Error> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| rejected(e.status(), e.body_text()))?;

    let (mut name, mut category, mut image) = (None, None, None);
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected(e.status(), e.body_text()))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => {
                name = Some(field.text().await.map_err(|e| rejected(e.status(), e.body_text()))?);
            }
            Some("category") => {
                category = Some(field.text().await.map_err(|e| rejected(e.status(), e.body_text()))?);
            }
            Some("image") => {
                let file_name = field.file_name().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| rejected(e.status(), e.body_text()))?;
                image = Some(ImageUpload {
                    file_name,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok((name, category, image))
}

async fn read_urlencoded(request: Request) -> Result<FormFields, Error> {
    let Form(mut fields) = Form::<HashMap<String, String>>::from_request(request, &())
        .await
        .map_err(|e| rejected(e.status(), e.body_text()))?;

    // The value is both the payload and the name checked for a .jpg suffix.
    let image = fields.remove("image").map(|value| ImageUpload {
        file_name: Some(value.clone()),
        data: value.into_bytes(),
    });

    Ok((fields.remove("name"), fields.remove("category"), image))
}

/// POST /items
pub async fn add_item(
    State(ctx): State<AppContext>,
    request: Request,
) -> Result<Json<AddItemResponse>, AppError> {
    let form = parse_add_item_request(request).await?;
    tracing::info!(name = %form.name, category = %form.category, "Item received");

    let new_item = NewItem::new(form.name, form.category, image_file_name(&form.image.data));
    new_item.validate()?;
    ctx.images.store(&form.image.data)?;

    let item = ctx.items.insert(&new_item)?;
    tracing::info!(id = %item.id, backend = ctx.items.name(), image = %item.image_name, "Item stored");

    Ok(Json(AddItemResponse {
        message: format!(
            "item received: {}, category received: {}, image name received: {}",
            item.name, item.category, item.image_name
        ),
        item,
    }))
}

/// GET /items
pub async fn get_items(State(ctx): State<AppContext>) -> Result<Json<GetItemsResponse>, AppError> {
    let items = ctx.items.get_items()?;
    Ok(Json(GetItemsResponse { items }))
}

/// GET /items/{id}
///
/// `id` is a zero-based position in the full item list, not the stored ID.
pub async fn get_item(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    let index: i64 = id
        .parse()
        .map_err(|_| Error::validation(format!("invalid item index: {id}")))?;

    let items = ctx.items.get_items()?;
    let item = usize::try_from(index)
        .ok()
        .and_then(|i| items.into_iter().nth(i))
        .ok_or_else(|| Error::not_found("item", index))?;

    Ok(Json(item))
}
