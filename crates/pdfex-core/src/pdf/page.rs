//! Per-page record assembly.

use tracing::{trace, warn};

use super::{RawImage, Result};
use crate::models::{ImageInfo, PageRecord};

/// Build the record for one page from its extracted parts.
///
/// A failed text extraction produces a record with empty text and the
/// error message attached; fonts and images are still reported for the
/// page. Image decode failures are logged and skipped, never failing the
/// page.
pub fn process_page(
    number: u32,
    text: Result<String>,
    fonts: Vec<String>,
    raw_images: &[RawImage],
    media_box: Option<[f32; 4]>,
    enable_images: bool,
) -> PageRecord {
    let (text, error) = match text {
        Ok(text) => (text, None),
        Err(e) => {
            warn!("page {}: {}", number, e);
            (String::new(), Some(e.to_string()))
        }
    };

    let word_count = text.split_whitespace().count();
    let char_count = text.chars().count();

    let images = if enable_images {
        decode_images(number, raw_images)
    } else {
        Vec::new()
    };

    PageRecord {
        page_number: number,
        text,
        word_count,
        char_count,
        fonts,
        images,
        media_box,
        error,
    }
}

fn decode_images(page: u32, raw_images: &[RawImage]) -> Vec<ImageInfo> {
    let mut images = Vec::new();
    for (index, raw) in raw_images.iter().enumerate() {
        match decode_image(index, raw) {
            Some(info) => images.push(info),
            None => warn!(
                "page {}: skipping image {} ({}x{}, filter {:?})",
                page, index, raw.width, raw.height, raw.filter
            ),
        }
    }
    images
}

/// Decode one embedded stream far enough to confirm format and dimensions.
fn decode_image(index: usize, raw: &RawImage) -> Option<ImageInfo> {
    let size_bytes = raw.data.len();

    match raw.filter.as_deref() {
        Some("DCTDecode") => {
            let decoded =
                image::load_from_memory_with_format(&raw.data, image::ImageFormat::Jpeg).ok()?;
            Some(ImageInfo {
                index,
                width: decoded.width(),
                height: decoded.height(),
                format: "jpeg".to_string(),
                size_bytes,
            })
        }
        Some("JPXDecode") | Some("CCITTFaxDecode") | Some("JBIG2Decode") => {
            trace!("unsupported image codec {:?}", raw.filter);
            None
        }
        _ => {
            verify_raw_samples(raw)?;
            Some(ImageInfo {
                index,
                width: raw.width,
                height: raw.height,
                format: "raw".to_string(),
                size_bytes,
            })
        }
    }
}

/// Check that an unencoded stream holds a plausible 8-bit sample buffer.
fn verify_raw_samples(raw: &RawImage) -> Option<()> {
    if raw.bits_per_component != 8 {
        trace!("unsupported bits per component: {}", raw.bits_per_component);
        return None;
    }

    let pixels = (raw.width as usize).checked_mul(raw.height as usize)?;
    let expected = match raw.color_space.as_deref() {
        Some("DeviceRGB") | Some("RGB") | Some("CalRGB") => pixels.checked_mul(3)?,
        Some("DeviceGray") | Some("G") | Some("CalGray") => pixels,
        Some("DeviceCMYK") => pixels.checked_mul(4)?,
        _ => return None,
    };

    if raw.data.len() >= expected && expected > 0 {
        Some(())
    } else {
        trace!(
            "sample buffer too small: {} bytes, expected {}",
            raw.data.len(),
            expected
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn rgb_image(width: u32, height: u32, data_len: usize) -> RawImage {
        RawImage {
            data: vec![0u8; data_len],
            width,
            height,
            filter: None,
            color_space: Some("DeviceRGB".to_string()),
            bits_per_component: 8,
        }
    }

    #[test]
    fn test_word_and_char_counts() {
        let record = process_page(1, Ok("two words".to_string()), vec![], &[], None, false);
        assert_eq!(record.word_count, 2);
        assert_eq!(record.char_count, 9);
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_whitespace_only_counts_zero_words() {
        let record = process_page(1, Ok("  \n\t  ".to_string()), vec![], &[], None, false);
        assert_eq!(record.word_count, 0);
        assert_eq!(record.char_count, 6);
    }

    #[test]
    fn test_failed_text_recorded_on_page() {
        let record = process_page(
            3,
            Err(PageError::TextExtraction("bad stream".to_string())),
            vec!["Helvetica".to_string()],
            &[],
            None,
            true,
        );
        assert_eq!(record.page_number, 3);
        assert_eq!(record.text, "");
        assert_eq!(record.word_count, 0);
        assert!(record.error.as_deref().unwrap().contains("bad stream"));
        // fonts survive a text failure
        assert_eq!(record.fonts, vec!["Helvetica".to_string()]);
    }

    #[test]
    fn test_images_disabled() {
        let record = process_page(
            1,
            Ok("text".to_string()),
            vec![],
            &[rgb_image(2, 2, 12)],
            None,
            false,
        );
        assert!(record.images.is_empty());
    }

    #[test]
    fn test_decode_raw_rgb() {
        let record = process_page(
            1,
            Ok(String::new()),
            vec![],
            &[rgb_image(2, 2, 12)],
            None,
            true,
        );
        assert_eq!(record.images.len(), 1);
        assert_eq!(record.images[0].format, "raw");
        assert_eq!(record.images[0].width, 2);
        assert_eq!(record.images[0].size_bytes, 12);
    }

    #[test]
    fn test_truncated_raw_image_skipped() {
        let record = process_page(
            1,
            Ok(String::new()),
            vec![],
            &[rgb_image(4, 4, 5)],
            None,
            true,
        );
        assert!(record.images.is_empty());
    }

    #[test]
    fn test_decode_jpeg() {
        let mut jpeg = Vec::new();
        let buffer = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        image::DynamicImage::ImageRgb8(buffer)
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();

        let raw = RawImage {
            data: jpeg,
            width: 3,
            height: 2,
            filter: Some("DCTDecode".to_string()),
            color_space: Some("DeviceRGB".to_string()),
            bits_per_component: 8,
        };

        let record = process_page(1, Ok(String::new()), vec![], &[raw], None, true);
        assert_eq!(record.images.len(), 1);
        assert_eq!(record.images[0].format, "jpeg");
        assert_eq!(record.images[0].width, 3);
        assert_eq!(record.images[0].height, 2);
    }

    #[test]
    fn test_unsupported_codec_skipped() {
        let raw = RawImage {
            data: vec![0u8; 100],
            width: 10,
            height: 10,
            filter: Some("JPXDecode".to_string()),
            color_space: None,
            bits_per_component: 8,
        };
        let record = process_page(1, Ok(String::new()), vec![], &[raw], None, true);
        assert!(record.images.is_empty());
    }
}
