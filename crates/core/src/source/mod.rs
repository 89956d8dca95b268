//! Input side: pages and document events produced by the PDF decoder.
//!
//! The decoder itself is external. It hands over pages either as a
//! pdf2json document dump ([`pdf2json`]) or as events pushed through a
//! bounded channel ([`stream`]).

pub mod pdf2json;
pub mod stream;

pub use pdf2json::Pdf2JsonDocument;
pub use stream::{DEFAULT_STREAM_BUFFER_CAPACITY, DecoderEvent, DocumentStream, EventSender, document_channel};

use crate::model::TextFragment;

/// One decoded page: its fragments in decoder order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub texts: Vec<TextFragment>,
}

impl Page {
    pub fn new(texts: Vec<TextFragment>) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            texts,
        }
    }
}

/// Ordered document events as consumed by the extractor.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentEvent {
    /// Document metadata, logged only.
    Metadata(serde_json::Value),
    Page(Page),
    /// No more pages.
    End,
    /// Hard decoder failure; fatal to the extraction.
    Failure(String),
}
