use axum::Router;
use campus::kernel::prelude::ApiState;
use campus::server::router::{api_router, page_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Campus", description = "Students, courses and enrollments"))]
struct ApiDoc;

/// Builds the full application: JSON API, system routes, `/api` docs and the HTML pages.
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(api_router())
        .merge(system_router())
        .with_state(state.clone())
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new()
        .merge(openapi_routes)
        .merge(scalar_routes)
        .merge(page_router().with_state(state))
        .layer(TraceLayer::new_for_http())
}
