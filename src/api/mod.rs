//! HTTP API for the journaling backend

pub mod auth_handlers;
pub mod emotion_handlers;
pub mod emotion_record_handlers;
pub mod handlers;
pub mod routes;
pub mod symptom_handlers;
pub mod thought_handlers;

pub use handlers::{ApiState, AppError, ServerState};
pub use routes::create_router;
