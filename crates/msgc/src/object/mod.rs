//! Object Module - Collector-managed object model
//!
//! This module defines the nodes of the client-built reference graph and the
//! handles used to name them.

pub mod handle;
pub mod managed;

pub use handle::ObjectHandle;
pub use managed::ManagedObject;
