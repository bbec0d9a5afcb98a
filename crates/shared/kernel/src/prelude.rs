//! Common imports for feature slices.

pub use crate::domain::config::ApiConfig;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};

#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiResult, ApiState, FormFields};
