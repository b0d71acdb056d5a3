use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::cliente::{ClienteId, UniqueField};
use crate::validation::Violations;

pub const INVALID_ID_MESSAGE: &str = "O ID do cliente deve ser um número válido.";
pub const NOT_FOUND_MESSAGE: &str = "Cliente não encontrado.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{}", .0.first_message())]
    Validation(Violations),
    #[error("invalid cliente id `{0}`")]
    InvalidId(String),
    #[error("cliente {0} not found")]
    NotFound(ClienteId),
    #[error("{}", .0.conflict_message())]
    Duplicate(UniqueField),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0}")]
    Persistence(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        fields: Option<BTreeMap<String, String>>,
        correlation_id: String,
    },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text returned to the caller in the `error` member of the body.
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(DomainError::Validation(violations)) => Self::BadRequest {
                message: violations.first_message().to_owned(),
                fields: Some(
                    violations
                        .by_field()
                        .into_iter()
                        .map(|(field, message)| (field.to_owned(), message.to_owned()))
                        .collect(),
                ),
                correlation_id: unassigned(),
            },
            ApplicationError::Domain(DomainError::InvalidId(_)) => Self::BadRequest {
                message: INVALID_ID_MESSAGE.to_owned(),
                fields: None,
                correlation_id: unassigned(),
            },
            ApplicationError::Domain(DomainError::Duplicate(field)) => Self::BadRequest {
                message: field.conflict_message().to_owned(),
                fields: None,
                correlation_id: unassigned(),
            },
            ApplicationError::Domain(DomainError::NotFound(_)) => Self::NotFound {
                message: NOT_FOUND_MESSAGE.to_owned(),
                correlation_id: unassigned(),
            },
            ApplicationError::Persistence(message) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}
