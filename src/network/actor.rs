//! Network actor - runs HTTP requests in the Tokio async runtime

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::error::RequestError;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::Transport;
use crate::network::executor::execute;
use crate::network::response::ResponseResult;

/// Network actor that processes HTTP request commands.
///
/// Every request runs in its own task; there is no queue and no limit.
pub struct NetworkActor {
    transport: Arc<dyn Transport>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<u64>,
    cancel_handles: HashMap<u64, oneshot::Sender<()>>,
}

impl NetworkActor {
    pub fn new(transport: Arc<dyn Transport>, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            transport,
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::ExecuteRequest { id, descriptor }) => {
                            let (cancel_tx, mut cancel_rx) = oneshot::channel();
                            self.cancel_handles.insert(id, cancel_tx);

                            let response_tx = self.response_tx.clone();
                            let transport = Arc::clone(&self.transport);

                            self.active_requests.spawn(async move {
                                let start = Instant::now();
                                // Dropping the in-flight future on cancel closes its connection
                                let result = tokio::select! {
                                    biased;
                                    Ok(()) = &mut cancel_rx => ResponseResult::failure(&RequestError::Cancelled),
                                    result = execute(transport.as_ref(), &descriptor) => result,
                                };
                                let _ = response_tx.send(NetworkResponse::Completed {
                                    id,
                                    result,
                                    time_ms: start.elapsed().as_millis() as u64,
                                });
                                id
                            });
                        }

                        Some(NetworkCommand::CancelRequest(id)) => {
                            if let Some(cancel_tx) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling request");
                                let _ = cancel_tx.send(());
                            }
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            for (_, cancel_tx) in self.cancel_handles.drain() {
                                let _ = cancel_tx.send(());
                            }
                            break;
                        }
                    }
                }

                Some(finished) = self.active_requests.join_next() => {
                    if let Ok(id) = finished {
                        self.cancel_handles.remove(&id);
                    }
                }
            }
        }
    }
}
