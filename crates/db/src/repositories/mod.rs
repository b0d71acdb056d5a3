use async_trait::async_trait;
use thiserror::Error;

use cadastro_core::domain::cliente::{Cliente, ClienteId, NewCliente, UniqueField};
use cadastro_core::errors::{ApplicationError, DomainError};

pub mod cliente;
pub mod memory;

pub use cliente::SqlClienteRepository;
pub use memory::InMemoryClienteRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("unique constraint `{}` violated", .0.constraint_name())]
    UniqueViolation(UniqueField),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::UniqueViolation(field) => {
                ApplicationError::Domain(DomainError::Duplicate(field))
            }
            // The raw driver text is what callers see on a 500.
            RepositoryError::Database(sqlx::Error::Database(db_error)) => {
                ApplicationError::Persistence(db_error.message().to_string())
            }
            RepositoryError::Database(other) => ApplicationError::Persistence(other.to_string()),
            RepositoryError::Decode(message) => ApplicationError::Persistence(message),
        }
    }
}

/// Storage for `tb_cliente`. Every operation is a single statement.
#[async_trait]
pub trait ClienteRepository: Send + Sync {
    /// Newest first by `created_at`, ties broken by id.
    async fn list(&self) -> Result<Vec<Cliente>, RepositoryError>;

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>, RepositoryError>;

    async fn create(&self, cliente: NewCliente) -> Result<Cliente, RepositoryError>;

    /// Replaces all business fields. `None` when the id does not exist.
    async fn update(
        &self,
        id: ClienteId,
        cliente: NewCliente,
    ) -> Result<Option<Cliente>, RepositoryError>;

    /// `false` when the id does not exist.
    async fn delete(&self, id: ClienteId) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use cadastro_core::domain::cliente::UniqueField;
    use cadastro_core::errors::{ApplicationError, DomainError};

    use super::RepositoryError;

    #[test]
    fn unique_violation_becomes_duplicate_domain_error() {
        let mapped = ApplicationError::from(RepositoryError::UniqueViolation(UniqueField::Nome));
        assert_eq!(mapped, ApplicationError::Domain(DomainError::Duplicate(UniqueField::Nome)));
    }

    #[test]
    fn decode_error_becomes_persistence_failure() {
        let mapped = ApplicationError::from(RepositoryError::Decode("bad created_at".to_string()));
        assert_eq!(mapped, ApplicationError::Persistence("bad created_at".to_string()));
    }
}
