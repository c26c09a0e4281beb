//! Event-mode invocation loop.

use tokio::sync::broadcast;

use crate::adapter::{EventAdapter, Handler, InvocationContext};
use crate::runtime::client::{RuntimeClient, RuntimeError};

/// Pulls events from the runtime one at a time and answers each through the adapter.
pub struct EventLoop<H> {
    client: RuntimeClient,
    adapter: EventAdapter<H>,
}

impl<H: Handler> EventLoop<H> {
    pub fn new(client: RuntimeClient, adapter: EventAdapter<H>) -> Self {
        Self { client, adapter }
    }

    /// Run until shutdown is signalled or the runtime API becomes unreachable.
    ///
    /// A failed invocation is reported to the runtime and the loop continues;
    /// only transport failures end it.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), RuntimeError> {
        tracing::info!("Event loop started");

        loop {
            let invocation = tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
                next = self.client.next_invocation() => next?,
            };

            let request_id = invocation.request_id.clone();
            let context = InvocationContext {
                request_id: Some(invocation.request_id),
                deadline: invocation.deadline,
            };

            match self.adapter.invoke_async(invocation.payload, context).await {
                Ok(body) => self.client.send_response(&request_id, body).await?,
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Reporting invocation error");
                    self.client.send_error(&request_id, &e).await?;
                }
            }
        }

        tracing::info!("Event loop stopped");
        Ok(())
    }
}
