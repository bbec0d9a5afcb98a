#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace: the error enum
//! attribute, API model and handler attributes, the feature slice wrapper and
//! the runtime entry point.
//!
//! The examples below are `ignore`d because proc-macro crates cannot use their
//! own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the specialized Tokio runtime.
///
/// Transforms an `async fn main` into a plain `fn main` that builds a runtime
/// from the named `campus_runtime::RuntimeConfig` profile and blocks on the body.
///
/// # Arguments
///
/// * `high_performance` - Server profile.
/// * `memory_efficient` - Low-footprint profile for tools.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[campus_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for JSON request/response bodies.
///
/// * Adds `Debug`, `Serialize` and `Deserialize` when missing.
/// * Adds `utoipa::ToSchema` when the consuming crate's `server` feature is on.
/// * Applies `rename_all = "camelCase"` and `deny_unknown_fields` unless told otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use campus_derive::api_model;
///
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct CourseBody {
///     pub course_code: Option<String>,
///     pub course_name: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to document an Axum handler with `utoipa::path`.
///
/// Accepts the regular `utoipa::path` arguments. The documentation is only
/// generated when the consuming crate's `server` feature is enabled.
///
/// # Example
///
/// ```rust,ignore
/// use campus_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/api/course/{course_id}",
///     params(("course_id" = i64, Path)),
///     responses((status = OK, body = CourseBody)),
///     tag = "Courses"
/// )]
/// pub async fn read_course(Path(course_id): Path<i64>) -> ApiResult<Json<CourseBody>> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` if an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`), and a context field.
/// 4. Tuple or unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use campus_derive::campus_error;
/// use std::borrow::Cow;
///
/// #[campus_error]
/// pub enum ReportError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &Path) -> Result<String, ReportError> {
///     std::fs::read_to_string(path).context("Reading score table")
/// }
/// ```
#[proc_macro_attribute]
pub fn campus_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// 1. Renames the annotated struct to `<Name>Inner`.
/// 2. Generates a cloneable `<Name>` wrapper around `Arc<<Name>Inner>`.
/// 3. Implements `Deref` to the inner state and `FeatureSlice` for the registry.
///
/// # Example
/// ```rust,ignore
/// #[campus_derive::campus_slice]
/// pub struct Registrar {
///     pub manager: EnrollmentManager,
/// }
///
/// let slice = Registrar::new(RegistrarInner { manager });
/// ```
#[proc_macro_attribute]
pub fn campus_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
