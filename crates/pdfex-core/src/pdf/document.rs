//! PDF document adapter built on lopdf and pdf-extract.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{DocumentReader, Result};
use crate::error::{DocumentError, PageError};
use crate::models::DocumentMetadata;

/// An opened PDF document.
///
/// Owns the parsed document and the raw bytes for the lifetime of one
/// extraction; dropping the value releases both on every exit path.
pub struct PdfDocument {
    doc: Document,
    raw: Vec<u8>,
    pages: BTreeMap<u32, ObjectId>,
}

/// An embedded image stream as stored in the document, before decoding.
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Stream content. For DCT-encoded images this is the JPEG payload;
    /// otherwise the decompressed sample data.
    pub data: Vec<u8>,
    /// Width in pixels, from the image dictionary.
    pub width: u32,
    /// Height in pixels, from the image dictionary.
    pub height: u32,
    /// First entry of the /Filter chain, if any.
    pub filter: Option<String>,
    /// Color space name, if resolvable.
    pub color_space: Option<String>,
    /// Bits per color component.
    pub bits_per_component: u8,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open(path: &Path) -> std::result::Result<Self, DocumentError> {
        let raw = fs::read(path).map_err(|e| DocumentError::Parse(e.to_string()))?;
        Self::from_bytes(raw)
    }

    /// Open a PDF from raw bytes.
    pub fn from_bytes(raw: Vec<u8>) -> std::result::Result<Self, DocumentError> {
        if raw.is_empty() {
            return Err(DocumentError::Empty);
        }

        let mut doc = Document::load_mem(&raw).map_err(|e| DocumentError::Parse(e.to_string()))?;

        // Handle PDFs with empty-password encryption
        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            // Re-save so the text extractor sees plaintext streams
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DocumentError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            raw
        };

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DocumentError::NoPages);
        }

        debug!("loaded PDF with {} pages", pages.len());
        Ok(Self { doc, raw, pages })
    }

    /// Resources dictionary for a page, walking Parent inheritance.
    fn page_resources(&self, page_id: ObjectId) -> Option<Dictionary> {
        let page = self.doc.get_object(page_id).ok()?;
        if let Object::Dictionary(dict) = page {
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = self.doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                return self.inherited_resources(*parent_id);
            }
        }
        None
    }

    fn inherited_resources(&self, node_id: ObjectId) -> Option<Dictionary> {
        let node = self.doc.get_object(node_id).ok()?;
        if let Object::Dictionary(dict) = node {
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = self.doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                return self.inherited_resources(*parent_id);
            }
        }
        None
    }

    /// Inheritable page attribute (MediaBox and friends).
    fn page_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;
        loop {
            let node = self.doc.get_object(current).ok()?;
            let Object::Dictionary(dict) = node else {
                return None;
            };
            if let Ok(value) = dict.get(key) {
                if let Ok((_, resolved)) = self.doc.dereference(value) {
                    return Some(resolved.clone());
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current = *parent_id,
                _ => return None,
            }
        }
    }

    fn raw_image_from_stream(&self, stream: &lopdf::Stream) -> Option<RawImage> {
        let dict = &stream.dict;

        let subtype = dict.get(b"Subtype").ok()?;
        if subtype.as_name().ok()? != b"Image" {
            return None;
        }

        let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
        let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

        let filter = dict.get(b"Filter").ok().and_then(|f| match f {
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            Object::Array(arr) => arr
                .first()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned()),
            _ => None,
        });

        // JPEG payloads stay compressed; everything else is decompressed
        // down to raw samples where possible.
        let data = if filter.as_deref() == Some("DCTDecode") {
            stream.content.clone()
        } else {
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone())
        };

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => self
                    .doc
                    .get_object(*r)
                    .ok()
                    .and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .map(|n| String::from_utf8_lossy(n).into_owned());

        let bits_per_component = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8) as u8;

        trace!(
            "image stream: {}x{}, filter={:?}, colorspace={:?}",
            width, height, filter, color_space
        );

        Some(RawImage {
            data,
            width,
            height,
            filter,
            color_space,
            bits_per_component,
        })
    }

    fn info_dict(&self) -> Option<Dictionary> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        match self.doc.dereference(info) {
            Ok((_, Object::Dictionary(dict))) => Some(dict.clone()),
            _ => None,
        }
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, or byte string).
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = dict.get(key).ok()?;
    let text = match value {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        _ => return None,
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number_as_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

impl DocumentReader for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> DocumentMetadata {
        let mut metadata = DocumentMetadata {
            page_count: self.page_count(),
            ..DocumentMetadata::default()
        };

        if let Some(info) = self.info_dict() {
            metadata.title = info_string(&info, b"Title");
            metadata.author = info_string(&info, b"Author");
            metadata.subject = info_string(&info, b"Subject");
            metadata.creator = info_string(&info, b"Creator");
            metadata.producer = info_string(&info, b"Producer");
            metadata.creation_date = info_string(&info, b"CreationDate");
            metadata.mod_date = info_string(&info, b"ModDate");
        }

        metadata
    }

    fn page_texts(&self) -> Vec<Result<String>> {
        let count = self.pages.len();

        match pdf_extract::extract_text_from_mem_by_pages(&self.raw) {
            Ok(texts) if texts.len() == count => texts.into_iter().map(Ok).collect(),
            Ok(texts) => {
                debug!(
                    "text pass returned {} pages, document has {}",
                    texts.len(),
                    count
                );
                let mut out: Vec<Result<String>> =
                    texts.into_iter().take(count).map(Ok).collect();
                while out.len() < count {
                    out.push(Ok(String::new()));
                }
                out
            }
            Err(e) => {
                // One bad page can sink the whole-document pass; retry
                // page by page so the failure stays local.
                warn!("document text pass failed ({}), retrying per page", e);
                self.pages
                    .keys()
                    .map(|&number| {
                        self.doc
                            .extract_text(&[number])
                            .map_err(|e| PageError::TextExtraction(e.to_string()))
                    })
                    .collect()
            }
        }
    }

    fn page_fonts(&self, page: u32) -> Vec<String> {
        let Some(page_id) = self.pages.get(&page) else {
            return Vec::new();
        };

        let mut fonts = std::collections::BTreeSet::new();

        if let Some(resources) = self.page_resources(*page_id) {
            if let Ok(font_res) = resources.get(b"Font") {
                if let Ok((_, Object::Dictionary(font_dict))) = self.doc.dereference(font_res) {
                    for (_name, font_ref) in font_dict.iter() {
                        let Ok((_, Object::Dictionary(font))) = self.doc.dereference(font_ref)
                        else {
                            continue;
                        };
                        if let Ok(base) = font.get(b"BaseFont") {
                            if let Ok(name) = base.as_name() {
                                fonts.insert(String::from_utf8_lossy(name).into_owned());
                            }
                        }
                    }
                }
            }
        }

        if fonts.is_empty() {
            trace!("no font information for page {}", page);
        }
        fonts.into_iter().collect()
    }

    fn page_images(&self, page: u32) -> Vec<RawImage> {
        let Some(page_id) = self.pages.get(&page) else {
            return Vec::new();
        };

        let mut images = Vec::new();

        if let Some(resources) = self.page_resources(*page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = self.doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, Object::Stream(stream))) = self.doc.dereference(obj_ref) {
                            if let Some(img) = self.raw_image_from_stream(stream) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        debug!("page {}: {} embedded image streams", page, images.len());
        images
    }

    fn media_box(&self, page: u32) -> Option<[f32; 4]> {
        let page_id = self.pages.get(&page)?;
        let value = self.page_attribute(*page_id, b"MediaBox")?;
        let Object::Array(values) = value else {
            return None;
        };
        if values.len() != 4 {
            return None;
        }
        let mut bbox = [0f32; 4];
        for (slot, obj) in bbox.iter_mut().zip(values.iter()) {
            *slot = number_as_f32(obj)?;
        }
        Some(bbox)
    }
}
