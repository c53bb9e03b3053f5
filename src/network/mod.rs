//! Network layer - HTTP request execution
//!
//! The Network actor receives request commands and sends back normalized
//! results.

pub mod actor;
pub mod client;
pub mod executor;
pub mod response;

pub use actor::NetworkActor;
pub use client::{create_client, ReqwestTransport, Transport};
pub use executor::execute;
pub use response::{ResponseResult, ResponseSuccess};
