//! Facade crate for the campus feature slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `campus` with the `server` feature for the HTTP surfaces.
//! - Pass [`migrations()`] to the database builder, then call [`init`] to build the slices.

use campus_database::{Database, Migration};
pub use campus_domain as domain;
use campus_domain::config::ApiConfig;
pub use campus_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use axum::Router;
        use campus_kernel::server::ApiState;
        pub use campus_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// Every JSON endpoint of the enabled slices.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            OpenApiRouter::new().merge(crate::features::registrar::server::api_router())
        }

        /// Every server-rendered page of the enabled slices.
        pub fn page_router() -> Router<ApiState> {
            crate::features::registrar::server::page_router()
                .merge(crate::features::gradebook::server::page_router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use campus_gradebook as gradebook;
    pub use campus_registrar as registrar;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "registrar",
        "gradebook",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema scripts of every slice that owns tables, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::registrar::MIGRATIONS.to_vec()
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Students, courses and enrollments
    slices.push(features::registrar::init(database)?);

    // CSV score reports
    slices.push(features::gradebook::init(config)?);

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_are_listed() {
        assert!(features::is_enabled("registrar"));
        assert!(features::is_enabled("gradebook"));
        assert!(!features::is_enabled("payroll"));
    }

    #[test]
    fn migrations_are_versioned_per_slice() {
        let migrations = migrations();
        assert!(!migrations.is_empty());
        assert!(migrations.iter().all(|m| m.slice == features::registrar::SLICE));
    }
}
