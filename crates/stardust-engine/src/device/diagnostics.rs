use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of uncaptured device errors.
///
/// wgpu reports validation failures out of band. The handler installed on the
/// device logs each one and bumps a counter; synchronous call sites take a
/// checkpoint before a device call and ask [`DeviceErrors::since`] afterwards to
/// turn a rejection into a typed error.
#[derive(Debug, Clone, Default)]
pub struct DeviceErrors {
    inner: Arc<ErrorLog>,
}

#[derive(Debug, Default)]
struct ErrorLog {
    count: AtomicU64,
    last: Mutex<Option<String>>,
}

/// Opaque position in the error stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ErrorCheckpoint(u64);

impl DeviceErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records one device error. Never panics, never propagates.
    pub fn record(&self, message: impl Into<String>) {
        let message = message.into();
        log::error!("uncaptured device error: {message}");

        if let Ok(mut last) = self.inner.last.lock() {
            *last = Some(message);
        }
        self.inner.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Total errors recorded so far.
    pub fn count(&self) -> u64 {
        self.inner.count.load(Ordering::SeqCst)
    }

    pub fn checkpoint(&self) -> ErrorCheckpoint {
        ErrorCheckpoint(self.count())
    }

    /// Returns the most recent message if any error was recorded after `checkpoint`.
    pub fn since(&self, checkpoint: ErrorCheckpoint) -> Option<String> {
        if self.count() == checkpoint.0 {
            return None;
        }

        let last = self.inner.last.lock().ok().and_then(|l| l.clone());
        Some(last.unwrap_or_else(|| "unknown device error".to_string()))
    }

    /// Installs the logging handler on `device`.
    pub(crate) fn attach(&self, device: &wgpu::Device) {
        let sink = self.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| {
            sink.record(err.to_string());
        }));
    }
}
