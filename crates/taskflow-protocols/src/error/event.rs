//! Event delivery errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event sink unavailable: {0}")]
    Unavailable(String),

    #[error("Event delivery failed: {0}")]
    DeliveryFailed(String),
}
