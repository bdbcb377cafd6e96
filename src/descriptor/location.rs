//! Where an image's descriptor lives, derived from the viewer page URL.
//!
//! The viewer page is opened as `<base>/viewer?id=<image_id>`. The
//! descriptor is then resolved relative to the page:
//!
//! ```text
//! <base>/deepzoom/<image_id>/slide.dzi
//! <base>/deepzoom/<image_id>/overlays/<overlay_id>/slide.dzi
//! ```

use url::Url;

use crate::error::DescriptorError;

/// Query parameter carrying the image identifier.
pub const IMAGE_ID_PARAM: &str = "id";

/// File name of the descriptor inside an image directory.
pub const DESCRIPTOR_FILE: &str = "slide.dzi";

/// Location of one image (or one overlay of an image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    page: Url,
    image_id: String,
    overlay_id: Option<String>,
}

impl ImageLocation {
    /// Create a location for `image_id` relative to `page_url`.
    pub fn new(page_url: &str, image_id: impl Into<String>) -> Result<Self, DescriptorError> {
        let page = parse_url(page_url)?;
        Ok(Self {
            page,
            image_id: image_id.into(),
            overlay_id: None,
        })
    }

    /// Read the `id` query parameter from a page URL.
    ///
    /// Returns `Ok(None)` when the page carries no (or an empty) `id`: there
    /// is nothing to load and the map stays empty.
    pub fn from_page_url(page_url: &str) -> Result<Option<Self>, DescriptorError> {
        let page = parse_url(page_url)?;

        let image_id = page
            .query_pairs()
            .find(|(key, _)| key == IMAGE_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty());

        Ok(image_id.map(|image_id| Self {
            page,
            image_id,
            overlay_id: None,
        }))
    }

    /// The same image, pointing at one of its overlays.
    pub fn overlay(&self, overlay_id: impl Into<String>) -> Self {
        Self {
            page: self.page.clone(),
            image_id: self.image_id.clone(),
            overlay_id: Some(overlay_id.into()),
        }
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn overlay_id(&self) -> Option<&str> {
        self.overlay_id.as_deref()
    }

    /// Absolute URL of the descriptor.
    pub fn descriptor_url(&self) -> Result<Url, DescriptorError> {
        let image = urlencoding::encode(&self.image_id);
        let relative = match &self.overlay_id {
            None => format!("deepzoom/{}/{}", image, DESCRIPTOR_FILE),
            Some(overlay) => format!(
                "deepzoom/{}/overlays/{}/{}",
                image,
                urlencoding::encode(overlay),
                DESCRIPTOR_FILE
            ),
        };

        self.page
            .join(&relative)
            .map_err(|e| DescriptorError::InvalidUrl {
                url: relative,
                reason: e.to_string(),
            })
    }
}

fn parse_url(raw: &str) -> Result<Url, DescriptorError> {
    Url::parse(raw).map_err(|e| DescriptorError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
