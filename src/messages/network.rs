//! Network messages - communication between App and Network layers

use crate::composer::RequestDescriptor;
use crate::network::ResponseResult;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute a composed request (buffered)
    ExecuteRequest {
        id: u64,
        descriptor: RequestDescriptor,
    },
    /// Cancel a pending request
    CancelRequest(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Terminal outcome of a request, including cancellation
    Completed {
        id: u64,
        result: ResponseResult,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
