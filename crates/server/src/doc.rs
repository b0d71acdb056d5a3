//! OpenAPI document for the REST API, served with Swagger UI at `/api-docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::clientes::ErrorBody;
use crate::health::{HealthCheck, HealthResponse};
use crate::schemas::{ClienteInputSchema, ClienteSchema};

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API de Clientes",
        description = "CRUD de clientes com validação de campos e unicidade de nome e CNPJ."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::clientes::list_clientes,
        crate::clientes::get_cliente,
        crate::clientes::create_cliente,
        crate::clientes::update_cliente,
        crate::clientes::delete_cliente,
        crate::health::health,
    ),
    components(schemas(ClienteSchema, ClienteInputSchema, ErrorBody, HealthResponse, HealthCheck)),
    tags(
        (name = "Cliente", description = "Endpoints para gerenciar clientes"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()).into()
}
