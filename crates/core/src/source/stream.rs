//! Ordered delivery of decoder events over a bounded channel.
//!
//! A decoder may finish pages out of order. [`DocumentStream`] buffers
//! early pages by index and releases them strictly in page order, so the
//! extractor always sees page 0, 1, 2, ... regardless of scheduling.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

use tracing::warn;

use super::{DocumentEvent, Page};

pub const DEFAULT_STREAM_BUFFER_CAPACITY: usize = 50;

const DISCONNECTED: &str = "decoder disconnected before end of document";

/// Events as emitted by a decoder; pages carry their zero-based index.
#[derive(Clone, Debug, PartialEq)]
pub enum DecoderEvent {
    Metadata(serde_json::Value),
    Page { index: usize, page: Page },
    End,
    Failure(String),
}

/// Producer half of a document channel.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: SyncSender<DecoderEvent>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    /// Blocks while the channel is full. Returns `false` once the
    /// consuming stream is gone.
    pub fn send(&self, event: DecoderEvent) -> bool {
        if self.tx.send(event).is_err() {
            self.cancel.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Set when the consumer dropped the stream; producers should stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Consumer half: an iterator of page-ordered [`DocumentEvent`]s.
#[derive(Debug)]
pub struct DocumentStream {
    rx: Receiver<DecoderEvent>,
    next_index: usize,
    buffer: BTreeMap<usize, Page>,
    ended: bool,
    finished: bool,
    max_buffered: usize,
    cancel: Arc<AtomicBool>,
}

/// Create a bounded channel between a decoder and the extractor.
pub fn document_channel(capacity: usize) -> (EventSender, DocumentStream) {
    let (tx, rx) = sync_channel(capacity);
    let cancel = Arc::new(AtomicBool::new(false));
    let sender = EventSender {
        tx,
        cancel: Arc::clone(&cancel),
    };
    let stream = DocumentStream {
        rx,
        next_index: 0,
        buffer: BTreeMap::new(),
        ended: false,
        finished: false,
        max_buffered: 0,
        cancel,
    };
    (sender, stream)
}

impl DocumentStream {
    /// Largest number of pages held back waiting for an earlier page.
    pub const fn max_buffered(&self) -> usize {
        self.max_buffered
    }
}

impl Iterator for DocumentStream {
    type Item = DocumentEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(page) = self.buffer.remove(&self.next_index) {
                self.next_index += 1;
                return Some(DocumentEvent::Page(page));
            }

            if self.ended {
                // Gaps are skipped; what is left still goes out in order.
                if let Some((index, page)) = self.buffer.pop_first() {
                    self.next_index = index + 1;
                    return Some(DocumentEvent::Page(page));
                }
                self.finished = true;
                return Some(DocumentEvent::End);
            }

            match self.rx.recv() {
                Ok(DecoderEvent::Metadata(meta)) => return Some(DocumentEvent::Metadata(meta)),
                Ok(DecoderEvent::Page { index, page }) => {
                    // Already released or already waiting: keep the first copy.
                    if index < self.next_index || self.buffer.contains_key(&index) {
                        warn!(index, next_index = self.next_index, "dropping stale page");
                        continue;
                    }
                    self.buffer.insert(index, page);
                    if self.buffer.len() > self.max_buffered {
                        self.max_buffered = self.buffer.len();
                    }
                }
                Ok(DecoderEvent::End) => self.ended = true,
                Ok(DecoderEvent::Failure(message)) => {
                    self.finished = true;
                    return Some(DocumentEvent::Failure(message));
                }
                Err(_) => {
                    self.finished = true;
                    return Some(DocumentEvent::Failure(DISCONNECTED.to_string()));
                }
            }
        }
    }
}

impl Drop for DocumentStream {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}
