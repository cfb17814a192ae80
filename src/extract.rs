//! HTML document extraction
//!
//! Turns one HTML member into a normalized [`Document`]. Extraction is
//! best-effort and never fails: malformed markup degrades to whatever text
//! the parser recovers, and an empty body yields an empty content string.

use crate::types::{Document, DocumentId};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

/// Extracts normalized documents from HTML byte blobs
///
/// Selectors are pre-compiled once; the extractor is cheap to share.
pub struct DocumentExtractor {
    title_selector: Option<Selector>,
    body_selector: Option<Selector>,
}

impl DocumentExtractor {
    /// Create a new extractor with pre-compiled selectors
    pub fn new() -> Self {
        Self {
            title_selector: Selector::parse("title").ok(),
            body_selector: Selector::parse("body").ok(),
        }
    }

    /// Extract a [`Document`] from an HTML byte blob
    ///
    /// The title comes from the document's title element; when the element is
    /// missing or empty, `fallback_name` (the member's file name) is used.
    pub fn extract(&self, html: &[u8], fallback_name: &str) -> Document {
        let raw = String::from_utf8_lossy(html);
        let dom = Html::parse_document(&raw);

        let title = self
            .title_selector
            .as_ref()
            .and_then(|selector| dom.select(selector).next())
            .map(|element| element.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let content = self
            .body_selector
            .as_ref()
            .and_then(|selector| dom.select(selector).next())
            .map(|body| Self::visible_text(&body))
            .unwrap_or_default();

        Document {
            document_id: DocumentId::new(),
            title,
            content,
            summary: String::new(),
            tags: Vec::new(),
            source_url: String::new(),
            related_documents: None,
            last_edited_time: Utc::now(),
        }
    }

    /// Concatenate the visible text of an element subtree
    ///
    /// Script, style, and noscript subtrees are skipped; whitespace runs are
    /// collapsed to single spaces.
    fn visible_text(element: &ElementRef) -> String {
        let mut text = String::new();

        for node in element.descendants() {
            let Some(text_node) = node.value().as_text() else {
                continue;
            };

            // Text inside script/style/noscript subtrees is not visible
            let mut hidden = false;
            let mut current = node.parent();
            while let Some(parent) = current {
                if let Some(elem) = parent.value().as_element() {
                    if matches!(elem.name(), "script" | "style" | "noscript") {
                        hidden = true;
                        break;
                    }
                }
                current = parent.parent();
            }
            if hidden {
                continue;
            }

            let collapsed = text_node.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&collapsed);
        }

        text
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
