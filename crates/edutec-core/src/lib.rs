//! Shared plumbing for EduTecHub services: liveness handler, tracing
//! bootstrap, and the request-id middleware layer.

pub mod health;
pub mod middleware;
pub mod tracing;
