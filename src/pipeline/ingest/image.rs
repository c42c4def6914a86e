//! Placeholder extraction for images and scanned documents.
//!
//! No OCR runs locally. The single placeholder page flags that the text
//! content must come from the external vision model, which reads the
//! original image bytes — not this extractor's output.

use super::types::{FormatExtraction, Page};

/// Marker text standing in for content the vision model has yet to read.
pub const VISION_PLACEHOLDER: &str =
    "[vision extraction required] Image or scanned document; text content must \
     be read by the external vision model from the original bytes.";

/// Ceiling for any result that has not been confirmed by the vision model.
pub const VISION_QUALITY: f32 = 0.5;

pub fn extract() -> FormatExtraction {
    FormatExtraction {
        pages: vec![placeholder_page(1)],
        tables: vec![],
        quality: VISION_QUALITY,
    }
}

pub fn placeholder_page(page_number: usize) -> Page {
    Page {
        page_number,
        text: VISION_PLACEHOLDER.to_string(),
        tables: vec![],
        quality: Some(VISION_QUALITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_placeholder_page_at_half_confidence() {
        let extraction = extract();
        assert_eq!(extraction.pages.len(), 1);
        assert_eq!(extraction.pages[0].page_number, 1);
        assert!(extraction.pages[0].text.contains("vision extraction required"));
        assert!(extraction.quality <= 0.5);
    }
}
