//! `data:` URL encoding for inline images

use super::error::{OpenRouterError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use storybook_domain::{ImageFormat, PageImage};

const SCHEME: &str = "data:";

pub fn is_data_url(url: &str) -> bool {
    url.get(..SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
}

/// `data:<mime>;base64,<payload>`
pub fn encode(image: &PageImage) -> String {
    format!(
        "data:{};base64,{}",
        image.format().mime_type(),
        STANDARD.encode(image.bytes())
    )
}

/// Decode a base64 `data:` URL into an image.
///
/// The format is sniffed from the bytes; the declared MIME type is only a
/// fallback.
pub fn decode(url: &str) -> Result<PageImage> {
    if !is_data_url(url) {
        return Err(OpenRouterError::DataUrl("missing data: scheme".to_string()));
    }
    let (header, payload) = url[SCHEME.len()..]
        .split_once(',')
        .ok_or_else(|| OpenRouterError::DataUrl("missing ',' separator".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| OpenRouterError::DataUrl(format!("not base64 encoded: {}", header)))?;

    let bytes = STANDARD.decode(payload.trim())?;
    if bytes.is_empty() {
        return Err(OpenRouterError::DataUrl("empty payload".to_string()));
    }

    page_image(bytes, ImageFormat::from_mime(mime))
        .ok_or_else(|| OpenRouterError::UnsupportedImage(mime.to_string()))
}

/// Build a page image whose format is detected from its magic bytes,
/// falling back to `declared` when they are not recognised
pub fn page_image(bytes: Vec<u8>, declared: Option<ImageFormat>) -> Option<PageImage> {
    let format = sniff(&bytes).or(declared)?;
    Some(PageImage::new(bytes, format))
}

fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::WebP => Some(ImageFormat::Webp),
        _ => None,
    }
}
