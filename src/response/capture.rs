//! Buffered response capture.
//!
//! # Responsibilities
//! - Give the handler a "status / headers / body" sink
//! - Lock the status at the first commit (explicit status or first body write)
//! - Buffer body bytes in call order
//!
//! # States
//! ```text
//! NotStarted ──set_status(code)──▶ Committed(code)
//!     │                               ▲   │
//!     └──────write_body(bytes)────────┘   └── write_body appends, set_status ignored
//! ```
//! Headers stay writable in every state until the handler returns.

use std::io;

use crate::canonical::MultiMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    NotStarted,
    Committed,
}

/// Response sink exposed to the wrapped handler for one invocation.
#[derive(Debug)]
pub struct ResponseCapture {
    state: CaptureState,
    status: u16,
    headers: MultiMap,
    body: Vec<u8>,
}

impl ResponseCapture {
    pub fn new() -> Self {
        Self {
            state: CaptureState::NotStarted,
            status: 200,
            headers: MultiMap::headers(),
            body: Vec::new(),
        }
    }

    /// Record the status code. Only the first commit wins.
    pub fn set_status(&mut self, code: u16) {
        if self.state == CaptureState::NotStarted {
            self.status = code;
            self.state = CaptureState::Committed;
        } else {
            tracing::trace!(ignored = code, status = self.status, "Status already committed");
        }
    }

    /// Append body bytes, committing status 200 first if nothing was committed.
    pub fn write_body(&mut self, bytes: &[u8]) {
        if self.state == CaptureState::NotStarted {
            self.set_status(200);
        }
        self.body.extend_from_slice(bytes);
    }

    pub fn headers(&self) -> &MultiMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut MultiMap {
        &mut self.headers
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_committed(&self) -> bool {
        self.state == CaptureState::Committed
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (u16, MultiMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for ResponseCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
