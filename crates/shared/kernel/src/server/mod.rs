//! Axum building blocks shared by the feature routers.

mod error;
mod form;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiResult, ErrorBody, MessageBody};
pub use form::FormFields;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
