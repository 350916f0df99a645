//! Application services - Use case implementations

mod dispatch_service;

pub use dispatch_service::{DispatchPolicy, DispatchService, DispatchSettings};
