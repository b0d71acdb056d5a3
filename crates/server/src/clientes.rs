//! REST handlers for `tb_cliente`.
//!
//! - `GET    /api/cliente`       list, newest first
//! - `GET    /api/cliente/{id}`  fetch one record
//! - `POST   /api/cliente`       validate and insert
//! - `PUT    /api/cliente/{id}`  validate and replace the nine business fields
//! - `DELETE /api/cliente/{id}`  hard delete
//!
//! Each path also answers with a trailing slash.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use cadastro_core::domain::cliente::{Cliente, ClienteDraft, ClienteId};
use cadastro_core::errors::{ApplicationError, DomainError, InterfaceError};
use cadastro_core::validation::validate;
use cadastro_db::repositories::ClienteRepository;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schemas::{ClienteInputSchema, ClienteSchema};

#[derive(Clone)]
pub struct ClientesState {
    repository: Arc<dyn ClienteRepository>,
}

impl ClientesState {
    pub fn new(repository: Arc<dyn ClienteRepository>) -> Self {
        Self { repository }
    }
}

/// Body of every non-2xx answer.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// User-facing message.
    #[schema(example = "Cliente não encontrado.")]
    pub error: String,
    /// Per-field messages, present on validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self { error: error.into(), fields: None }
    }
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn router(repository: Arc<dyn ClienteRepository>) -> Router {
    let collection = get(list_clientes).post(create_cliente);
    let item = get(get_cliente).put(update_cliente).delete(delete_cliente);

    Router::new()
        .route("/api/cliente", collection.clone())
        .route("/api/cliente/", collection)
        .route("/api/cliente/{id}", item.clone())
        .route("/api/cliente/{id}/", item)
        .with_state(ClientesState::new(repository))
}

/// List every cliente, newest first.
#[utoipa::path(
    get,
    path = "/api/cliente",
    responses(
        (status = 200, description = "Clientes ordered by creation time, newest first", body = [ClienteSchema]),
        (status = 500, description = "Datastore failure", body = ErrorBody)
    ),
    tags = ["Cliente"],
    operation_id = "listClientes"
)]
pub async fn list_clientes(
    State(state): State<ClientesState>,
) -> Result<Json<Vec<Cliente>>, ApiError> {
    let correlation_id = new_correlation_id();
    let clientes = state
        .repository
        .list()
        .await
        .map_err(|error| reject(error.into(), &correlation_id, "list"))?;

    info!(
        event_name = "api.cliente.listed",
        correlation_id = %correlation_id,
        count = clientes.len(),
        "listed clientes"
    );
    Ok(Json(clientes))
}

/// Fetch one cliente by id.
#[utoipa::path(
    get,
    path = "/api/cliente/{id}",
    params(("id" = i64, Path, description = "Cliente id")),
    responses(
        (status = 200, description = "The cliente", body = ClienteSchema),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 404, description = "No cliente with this id", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody)
    ),
    tags = ["Cliente"],
    operation_id = "getCliente"
)]
pub async fn get_cliente(
    State(state): State<ClientesState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Cliente>, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&raw_id, &correlation_id, "get")?;

    let cliente = state
        .repository
        .find_by_id(id)
        .await
        .map_err(|error| reject(error.into(), &correlation_id, "get"))?
        .ok_or_else(|| reject(DomainError::NotFound(id).into(), &correlation_id, "get"))?;

    info!(
        event_name = "api.cliente.fetched",
        correlation_id = %correlation_id,
        cliente_id = %id,
        "fetched cliente"
    );
    Ok(Json(cliente))
}

/// Validate and insert a cliente.
#[utoipa::path(
    post,
    path = "/api/cliente",
    request_body = ClienteInputSchema,
    responses(
        (status = 201, description = "Created cliente", body = ClienteSchema),
        (status = 400, description = "Invalid body, or nome/CNPJ already registered", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody)
    ),
    tags = ["Cliente"],
    operation_id = "createCliente"
)]
pub async fn create_cliente(
    State(state): State<ClientesState>,
    payload: Result<Json<ClienteDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Cliente>), ApiError> {
    let correlation_id = new_correlation_id();
    let draft = read_draft(payload, &correlation_id, "create")?;
    let cliente = validate(&draft).map_err(|violations| {
        reject(DomainError::Validation(violations).into(), &correlation_id, "create")
    })?;

    let created = state
        .repository
        .create(cliente)
        .await
        .map_err(|error| reject(error.into(), &correlation_id, "create"))?;

    info!(
        event_name = "api.cliente.created",
        correlation_id = %correlation_id,
        cliente_id = %created.id,
        "created cliente"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the business fields of a cliente.
#[utoipa::path(
    put,
    path = "/api/cliente/{id}",
    params(("id" = i64, Path, description = "Cliente id")),
    request_body = ClienteInputSchema,
    responses(
        (status = 200, description = "Updated cliente", body = ClienteSchema),
        (status = 400, description = "Bad id, invalid body, or nome/CNPJ already registered", body = ErrorBody),
        (status = 404, description = "No cliente with this id", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody)
    ),
    tags = ["Cliente"],
    operation_id = "updateCliente"
)]
pub async fn update_cliente(
    State(state): State<ClientesState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ClienteDraft>, JsonRejection>,
) -> Result<Json<Cliente>, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&raw_id, &correlation_id, "update")?;
    let draft = read_draft(payload, &correlation_id, "update")?;
    let cliente = validate(&draft).map_err(|violations| {
        reject(DomainError::Validation(violations).into(), &correlation_id, "update")
    })?;

    let updated = state
        .repository
        .update(id, cliente)
        .await
        .map_err(|error| reject(error.into(), &correlation_id, "update"))?
        .ok_or_else(|| reject(DomainError::NotFound(id).into(), &correlation_id, "update"))?;

    info!(
        event_name = "api.cliente.updated",
        correlation_id = %correlation_id,
        cliente_id = %id,
        "updated cliente"
    );
    Ok(Json(updated))
}

/// Delete a cliente.
#[utoipa::path(
    delete,
    path = "/api/cliente/{id}",
    params(("id" = i64, Path, description = "Cliente id")),
    responses(
        (status = 204, description = "Cliente deleted"),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 404, description = "No cliente with this id", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody)
    ),
    tags = ["Cliente"],
    operation_id = "deleteCliente"
)]
pub async fn delete_cliente(
    State(state): State<ClientesState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = new_correlation_id();
    let id = parse_id(&raw_id, &correlation_id, "delete")?;

    let deleted = state
        .repository
        .delete(id)
        .await
        .map_err(|error| reject(error.into(), &correlation_id, "delete"))?;
    if !deleted {
        return Err(reject(DomainError::NotFound(id).into(), &correlation_id, "delete"));
    }

    info!(
        event_name = "api.cliente.deleted",
        correlation_id = %correlation_id,
        cliente_id = %id,
        "deleted cliente"
    );
    Ok(StatusCode::NO_CONTENT)
}

fn new_correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn parse_id(raw: &str, correlation_id: &str, operation: &'static str) -> Result<ClienteId, ApiError> {
    raw.parse::<ClienteId>().map_err(|_| {
        reject(DomainError::InvalidId(raw.to_string()).into(), correlation_id, operation)
    })
}

fn read_draft(
    payload: Result<Json<ClienteDraft>, JsonRejection>,
    correlation_id: &str,
    operation: &'static str,
) -> Result<ClienteDraft, ApiError> {
    match payload {
        Ok(Json(draft)) => Ok(draft),
        Err(rejection) => {
            let message = rejection.body_text();
            warn!(
                event_name = "api.cliente.rejected",
                correlation_id = %correlation_id,
                operation,
                error = %message,
                "request body is not a cliente object"
            );
            Err((StatusCode::BAD_REQUEST, Json(ErrorBody::message(message))))
        }
    }
}

fn reject(error: ApplicationError, correlation_id: &str, operation: &'static str) -> ApiError {
    let mapped = error.into_interface(correlation_id);

    let status = match &mapped {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "api.cliente.failed",
            correlation_id = %mapped.correlation_id(),
            operation,
            error = %mapped.user_message(),
            "cliente operation failed"
        );
    } else {
        warn!(
            event_name = "api.cliente.rejected",
            correlation_id = %mapped.correlation_id(),
            operation,
            status = status.as_u16(),
            error = %mapped.user_message(),
            "cliente request rejected"
        );
    }

    let error = mapped.user_message().to_string();
    let fields = match mapped {
        InterfaceError::BadRequest { fields, .. } => fields,
        InterfaceError::NotFound { .. } | InterfaceError::Internal { .. } => None,
    };
    (status, Json(ErrorBody { error, fields }))
}
