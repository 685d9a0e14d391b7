//! Sinks shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::clients::Sink;
use crate::error::SinkError;

/// Appends every payload to an in-memory buffer.
#[derive(Default)]
pub(crate) struct BufferSink {
    buf: Mutex<Vec<u8>>,
    writes: AtomicUsize,
}

impl BufferSink {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for BufferSink {
    async fn write(&self, payload: &[u8]) -> Result<(), SinkError> {
        self.buf.lock().unwrap().extend_from_slice(payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Rejects every payload.
pub(crate) struct FailingSink;

#[async_trait]
impl Sink for FailingSink {
    async fn write(&self, _payload: &[u8]) -> Result<(), SinkError> {
        Err(SinkError::other("always fails"))
    }
}
