//! HTML page rendering with Handlebars.
//!
//! Templates are compiled into the binary from `templates/` and registered
//! once at startup.

use handlebars::{Handlebars, RenderError, TemplateError};
use pictura_db::models::Image;
use serde::Serialize;

use super::flash::FlashMessage;
use super::MEDIA_URL;

const UPLOAD_TEMPLATE: &str = "upload";
const GALLERY_TEMPLATE: &str = "gallery";

/// Template data for one image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub size_display: String,
    pub date: String,
}

impl From<&Image> for ImageView {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id.get(),
            name: image.name.clone(),
            url: format!("{}{}", MEDIA_URL, image.path),
            size: image.size,
            size_display: format_size(image.size),
            date: image.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Data shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub messages: Vec<FlashMessage>,
    pub images: Vec<ImageView>,
    pub count: usize,
}

impl PageContext {
    pub fn new(title: &str, messages: Vec<FlashMessage>, images: &[Image]) -> Self {
        Self {
            title: title.to_string(),
            messages,
            images: images.iter().map(ImageView::from).collect(),
            count: images.len(),
        }
    }
}

/// Registry of the application's page templates.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("header", include_str!("../../templates/header.hbs"))?;
        registry.register_partial("footer", include_str!("../../templates/footer.hbs"))?;
        registry.register_template_string(
            UPLOAD_TEMPLATE,
            include_str!("../../templates/upload.hbs"),
        )?;
        registry.register_template_string(
            GALLERY_TEMPLATE,
            include_str!("../../templates/gallery.hbs"),
        )?;
        Ok(Self { registry })
    }

    /// Upload form with the most recent images.
    pub fn render_upload(&self, page: &PageContext) -> Result<String, RenderError> {
        self.registry.render(UPLOAD_TEMPLATE, page)
    }

    /// Full gallery listing.
    pub fn render_gallery(&self, page: &PageContext) -> Result<String, RenderError> {
        self.registry.render(GALLERY_TEMPLATE, page)
    }
}

/// Human-readable byte count, e.g. `18 B`, `1.5 KB`, `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
