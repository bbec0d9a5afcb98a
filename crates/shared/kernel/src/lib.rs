//! Kernel utilities shared across slices.
//!
//! Keep this crate lightweight: configuration loading, the server state
//! registry and the small HTTP helpers every slice needs.
//!
//! ## Config loading
//! ```rust,no_run
//! use campus_kernel::config::load_config;
//! use campus_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap_or_default();
//! ```

pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

pub use campus_domain as domain;
