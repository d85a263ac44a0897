//! Upload progress reporting.
//!
//! The request body is fed to the transport in chunks; every chunk handed over
//! advances a [`ProgressTracker`], which reports whole percentages through the
//! caller's callback. Values never go down. Transmission alone tops out at 99;
//! 100 is reported by [`ProgressTracker::finish`] once the store accepted the
//! file.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;

/// Callback receiving upload progress in percent (0..=100).
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Size of the chunks the request body is split into.
pub const CHUNK_SIZE: usize = 64 * 1024;

pub struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last: AtomicU8,
    started: AtomicBool,
    callback: ProgressFn,
}

impl ProgressTracker {
    /// Returns `None` when the total size is unknown (zero), in which case no
    /// progress is reported at all.
    pub fn new(total: u64, callback: ProgressFn) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self {
            total,
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            started: AtomicBool::new(false),
            callback,
        })
    }

    /// Report 0% once, before any bytes go out.
    pub fn start(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            (self.callback)(0);
        }
    }

    /// Account for `bytes` more bytes handed to the transport.
    pub fn advance(&self, bytes: u64) {
        self.start();
        let sent = self.sent.fetch_add(bytes, Ordering::SeqCst) + bytes;
        let percent = (sent.min(self.total) * 100 / self.total).min(99) as u8;
        self.report(percent);
    }

    /// Report 100% if it has not been reported yet.
    pub fn finish(&self) {
        self.start();
        self.report(100);
    }

    pub fn last_reported(&self) -> u8 {
        self.last.load(Ordering::SeqCst)
    }

    fn report(&self, percent: u8) {
        let previous = self.last.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            (self.callback)(percent);
        }
    }
}

/// Build a streaming request body that advances `tracker` as chunks are consumed.
pub fn tracked_body(data: Bytes, tracker: Option<Arc<ProgressTracker>>) -> reqwest::Body {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();

    if let Some(tracker) = &tracker {
        tracker.start();
    }

    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        if let Some(tracker) = &tracker {
            tracker.advance(chunk.len() as u64);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    }));

    reqwest::Body::wrap_stream(stream)
}
