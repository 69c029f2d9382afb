//! Page routes for uploading, listing and deleting images.

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::Method,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{any, get},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use pictura_common::ImageId;

use super::error::AppError;
use super::flash::{self, FlashMessage};
use super::templates::PageContext;
use super::AppContext;
use crate::images::Upload;

/// Where successful uploads and all delete requests end up.
pub const GALLERY_PATH: &str = "/gallery/";

const NO_FILE_SELECTED: &str = "No file selected";
const IMAGE_NOT_FOUND: &str = "Image not found";

/// Form field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";
/// Optional form field overriding the display name.
pub const NAME_FIELD: &str = "name";

pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(upload_form).post(upload_image))
        .route("/upload/", get(upload_form).post(upload_image))
        .route("/gallery/", get(gallery))
        .route("/delete/:image_id/", any(delete_image))
}

// ============================================================================
// Upload
// ============================================================================

/// Fields read from the upload form.
#[derive(Debug)]
struct UploadForm {
    file_name: String,
    name: Option<String>,
    data: Bytes,
}

impl UploadForm {
    fn as_upload(&self) -> Upload<'_> {
        Upload {
            file_name: &self.file_name,
            name: self.name.as_deref(),
            data: &self.data,
        }
    }
}

/// Collect the upload form fields.
///
/// Returns `None` when no file was sent. A file part with an empty file name
/// is what browsers send for an untouched file input, so it counts as absent.
async fn read_upload_form(mut multipart: Multipart) -> Result<Option<UploadForm>, MultipartError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut name = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(IMAGE_FIELD) if file.is_none() => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !file_name.is_empty() {
                    file = Some((file_name, data));
                }
            }
            Some(NAME_FIELD) => name = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(file.map(|(file_name, data)| UploadForm {
        file_name,
        name,
        data,
    }))
}

fn render_upload_page(ctx: &AppContext, messages: Vec<FlashMessage>) -> Result<Html<String>, AppError> {
    let recent = ctx.images.list_recent(ctx.config.upload.recent_limit)?;
    let page = PageContext::new("Upload an image", messages, &recent);
    Ok(Html(ctx.templates.render_upload(&page)?))
}

/// Upload form with the most recent images.
async fn upload_form(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, messages) = flash::take(jar);
    let html = render_upload_page(&ctx, messages)?;
    Ok((jar, html))
}

/// Store a submitted image and redirect to the gallery.
///
/// Missing files and save failures re-render the form with an error message.
async fn upload_image(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let (jar, mut messages) = flash::take(jar);

    let form = match multipart {
        Ok(multipart) => read_upload_form(multipart).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request is not multipart");
            Ok(None)
        }
    };

    match form {
        Ok(Some(form)) => match ctx.images.save_upload(form.as_upload()) {
            Ok(image) => {
                tracing::info!(
                    image_id = %image.id,
                    name = %image.name,
                    size = image.size,
                    path = %image.path,
                    "Image uploaded"
                );
                // Carry anything still pending over to the gallery page
                messages.push(FlashMessage::success(format!(
                    "Image \"{}\" uploaded successfully!",
                    image.name
                )));
                let jar = messages.into_iter().fold(jar, flash::push);
                return Ok((jar, Redirect::to(GALLERY_PATH)).into_response());
            }
            Err(e) => {
                tracing::warn!(file_name = %form.file_name, error = %e, "Upload failed");
                messages.push(FlashMessage::error(format!("Upload failed: {e:#}")));
            }
        },
        Ok(None) => {
            messages.push(FlashMessage::error(NO_FILE_SELECTED));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read upload form");
            messages.push(FlashMessage::error(format!("Upload failed: {e}")));
        }
    }

    let html = render_upload_page(&ctx, messages)?;
    Ok((jar, html).into_response())
}

// ============================================================================
// Gallery
// ============================================================================

/// Every image, newest first.
async fn gallery(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, messages) = flash::take(jar);
    let images = ctx.images.list_all()?;
    let page = PageContext::new("Gallery", messages, &images);
    let html = ctx.templates.render_gallery(&page)?;
    Ok((jar, Html(html)))
}

// ============================================================================
// Delete
// ============================================================================

/// Parse a path segment as an image ID. Only plain decimal digits match.
fn parse_image_id(raw: &str) -> Option<ImageId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Delete an image on POST. Every other method just goes back to the gallery.
async fn delete_image(
    State(ctx): State<AppContext>,
    method: Method,
    Path(image_id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let id = parse_image_id(&image_id).ok_or(AppError::NotFound)?;

    if method != Method::POST {
        return Ok(Redirect::to(GALLERY_PATH).into_response());
    }

    let message = match ctx.images.delete(id)? {
        Some(image) => {
            tracing::info!(image_id = %image.id, name = %image.name, "Image deleted");
            FlashMessage::success(format!("Image \"{}\" deleted successfully", image.name))
        }
        None => {
            tracing::debug!(image_id = %id, "Delete requested for missing image");
            FlashMessage::error(IMAGE_NOT_FOUND)
        }
    };

    let jar = flash::push(jar, message);
    Ok((jar, Redirect::to(GALLERY_PATH)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_id() {
        assert_eq!(parse_image_id("42"), Some(ImageId::from(42)));
        assert_eq!(parse_image_id("007"), Some(ImageId::from(7)));
        assert_eq!(parse_image_id("abc"), None);
        assert_eq!(parse_image_id("-1"), None);
        assert_eq!(parse_image_id("+1"), None);
        assert_eq!(parse_image_id(""), None);
        assert_eq!(parse_image_id("99999999999999999999"), None);
    }
}
