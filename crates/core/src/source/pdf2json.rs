//! Loader for pdf2json document dumps.
//!
//! Layout of the dump (only the fields used here):
//!
//! ```text
//! { "Meta": {...},
//!   "Pages": [ { "Width": 38.25, "Height": 49.5,
//!                "Texts": [ { "x": 2.1, "y": 9.6, "w": 48.3, "A": "left", "clr": 0,
//!                             "R": [ { "T": "Txn%20Date", "S": -1, "TS": [0, 13, 1, 0] } ] } ] } ] }
//! ```

use std::io::Read;
use std::thread;

use serde::Deserialize;
use tracing::trace;

use super::stream::{DecoderEvent, DocumentStream, document_channel};
use super::{DocumentEvent, Page};
use crate::error::Result;
use crate::model::{Alignment, StyleDescriptor, TextFragment, TextRun};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDocument {
    #[serde(default)]
    meta: serde_json::Value,
    #[serde(default)]
    pages: Vec<RawPage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPage {
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    texts: Vec<RawText>,
}

#[derive(Deserialize)]
struct RawText {
    x: f64,
    y: f64,
    #[serde(default)]
    w: f64,
    #[serde(rename = "A", default)]
    align: Option<String>,
    #[serde(default)]
    clr: Option<i64>,
    #[serde(default)]
    oc: Option<String>,
    #[serde(rename = "R", default)]
    runs: Vec<RawRun>,
}

#[derive(Deserialize)]
struct RawRun {
    #[serde(rename = "T")]
    text: String,
    #[serde(rename = "S", default)]
    style_index: i64,
    #[serde(rename = "TS", default)]
    style: [f64; 4],
}

/// Percent-decode run text; text that does not decode is kept as is.
fn decode_run_text(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            trace!(text = raw, error = %e, "keeping undecodable run text");
            raw.to_string()
        }
    }
}

impl From<RawRun> for TextRun {
    fn from(raw: RawRun) -> Self {
        let [font_face, font_size, bold, italic] = raw.style;
        TextRun {
            text: decode_run_text(&raw.text),
            style_index: raw.style_index,
            style: StyleDescriptor {
                font_face: font_face as i64,
                font_size,
                bold: bold != 0.0,
                italic: italic != 0.0,
            },
        }
    }
}

impl From<RawText> for TextFragment {
    fn from(raw: RawText) -> Self {
        TextFragment {
            x: raw.x,
            y: raw.y,
            width: raw.w,
            align: raw.align.as_deref().map_or(Alignment::Left, Alignment::from),
            color: raw.clr.unwrap_or(0),
            outline: raw.oc,
            runs: raw.runs.into_iter().map(TextRun::from).collect(),
        }
    }
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Page {
            width: raw.width,
            height: raw.height,
            texts: raw.texts.into_iter().map(TextFragment::from).collect(),
        }
    }
}

/// A whole pdf2json document, run text already decoded.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Pdf2JsonDocument {
    pub meta: serde_json::Value,
    pub pages: Vec<Page>,
}

impl From<RawDocument> for Pdf2JsonDocument {
    fn from(raw: RawDocument) -> Self {
        Pdf2JsonDocument {
            meta: raw.meta,
            pages: raw.pages.into_iter().map(Page::from).collect(),
        }
    }
}

impl Pdf2JsonDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Metadata (when present), every page in order, then `End`.
    pub fn into_events(self) -> Vec<DocumentEvent> {
        let mut events = Vec::with_capacity(self.pages.len() + 2);
        if !self.meta.is_null() {
            events.push(DocumentEvent::Metadata(self.meta));
        }
        events.extend(self.pages.into_iter().map(DocumentEvent::Page));
        events.push(DocumentEvent::End);
        events
    }

    /// Replay the document from a producer thread through a bounded
    /// decoder channel.
    pub fn spawn_decoder(self, capacity: usize) -> DocumentStream {
        let (sender, stream) = document_channel(capacity);
        thread::spawn(move || {
            if !self.meta.is_null() && !sender.send(DecoderEvent::Metadata(self.meta)) {
                return;
            }
            for (index, page) in self.pages.into_iter().enumerate() {
                if sender.is_cancelled() || !sender.send(DecoderEvent::Page { index, page }) {
                    return;
                }
            }
            sender.send(DecoderEvent::End);
        });
        stream
    }
}
