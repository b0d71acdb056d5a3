use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use cadastro_core::domain::cliente::{Cliente, ClienteId, NewCliente, UniqueField};

use super::{ClienteRepository, RepositoryError};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<ClienteId, Cliente>,
}

impl Table {
    fn conflict(&self, candidate: &NewCliente, ignore: Option<ClienteId>) -> Option<UniqueField> {
        self.rows.values().filter(|row| Some(row.id) != ignore).find_map(|row| {
            if row.cnpj == candidate.cnpj {
                Some(UniqueField::Cnpj)
            } else if row.nome == candidate.nome {
                Some(UniqueField::Nome)
            } else {
                None
            }
        })
    }
}

/// Process-local stand-in for `tb_cliente`, with the same uniqueness rules.
#[derive(Default)]
pub struct InMemoryClienteRepository {
    table: RwLock<Table>,
}

#[async_trait::async_trait]
impl ClienteRepository for InMemoryClienteRepository {
    async fn list(&self) -> Result<Vec<Cliente>, RepositoryError> {
        let table = self.table.read().await;
        let mut rows: Vec<Cliente> = table.rows.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, cliente: NewCliente) -> Result<Cliente, RepositoryError> {
        let mut table = self.table.write().await;
        if let Some(field) = table.conflict(&cliente, None) {
            return Err(RepositoryError::UniqueViolation(field));
        }

        table.next_id += 1;
        let created = cliente.into_cliente(ClienteId(table.next_id), Utc::now());
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: ClienteId,
        cliente: NewCliente,
    ) -> Result<Option<Cliente>, RepositoryError> {
        let mut table = self.table.write().await;
        let Some(created_at) = table.rows.get(&id).map(|row| row.created_at) else {
            return Ok(None);
        };
        if let Some(field) = table.conflict(&cliente, Some(id)) {
            return Err(RepositoryError::UniqueViolation(field));
        }

        let updated = cliente.into_cliente(id, created_at);
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: ClienteId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
