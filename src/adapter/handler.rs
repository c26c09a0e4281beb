//! The synchronous handler contract shared by both hosting modes.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::canonical::Request;
use crate::error::AdapterError;
use crate::response::ResponseCapture;

/// Serve one HTTP request by writing into a response capture.
///
/// The handler reads method, path, query, headers and body from the request,
/// and writes status (first commit wins), headers, and body bytes in order.
/// Implemented for any `Fn(&Request, &mut ResponseCapture)`.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, request: &Request, response: &mut ResponseCapture);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut ResponseCapture) + Send + Sync + 'static,
{
    fn serve(&self, request: &Request, response: &mut ResponseCapture) {
        self(request, response)
    }
}

/// Run `handler` against a fresh capture, turning a panic into an error.
pub fn serve_captured<H: Handler + ?Sized>(
    handler: &H,
    request: &Request,
) -> Result<ResponseCapture, AdapterError> {
    let mut capture = ResponseCapture::new();
    panic::catch_unwind(AssertUnwindSafe(|| handler.serve(request, &mut capture)))
        .map_err(|payload| AdapterError::HandlerPanicked(panic_message(payload.as_ref())))?;
    Ok(capture)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
