use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::Row;

use cadastro_core::domain::cliente::{Cliente, ClienteId, NewCliente, UniqueField};

use super::{ClienteRepository, RepositoryError};
use crate::DbPool;

const CLIENTE_COLUMNS: &str =
    "id, created_at, nome, cnpj, segmento, cep, endereco, numero, bairro, cidade, estado";

pub struct SqlClienteRepository {
    pool: DbPool,
}

impl SqlClienteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tb_cliente")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn row_to_cliente(row: &sqlx::sqlite::SqliteRow) -> Result<Cliente, RepositoryError> {
    let text = |column: &str| -> Result<String, RepositoryError> {
        row.try_get::<String, _>(column).map_err(|e| RepositoryError::Decode(e.to_string()))
    };

    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str = text("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::Decode(format!("invalid created_at `{created_at_str}`: {e}"))
        })?;

    Ok(Cliente {
        id: ClienteId(id),
        created_at,
        nome: text("nome")?,
        cnpj: text("cnpj")?,
        segmento: text("segmento")?,
        cep: text("cep")?,
        endereco: text("endereco")?,
        numero: text("numero")?,
        bairro: text("bairro")?,
        cidade: text("cidade")?,
        estado: text("estado")?,
    })
}

/// Resolves which unique column a driver error refers to. Prefers the
/// constraint name when the driver reports one, otherwise the
/// `table.column` suffix SQLite puts in its message.
fn unique_field(constraint: Option<&str>, message: &str) -> Option<UniqueField> {
    [UniqueField::Cnpj, UniqueField::Nome].into_iter().find(|field| {
        constraint == Some(field.constraint_name())
            || message.ends_with(&format!("tb_cliente.{}", field.column()))
    })
}

fn map_write_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_error) = &error {
        if matches!(db_error.kind(), ErrorKind::UniqueViolation) {
            if let Some(field) = unique_field(db_error.constraint(), db_error.message()) {
                return RepositoryError::UniqueViolation(field);
            }
        }
    }
    RepositoryError::Database(error)
}

#[async_trait::async_trait]
impl ClienteRepository for SqlClienteRepository {
    async fn list(&self) -> Result<Vec<Cliente>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(&format!(
            "SELECT {CLIENTE_COLUMNS} FROM tb_cliente ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_cliente).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {CLIENTE_COLUMNS} FROM tb_cliente WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_cliente(r)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, cliente: NewCliente) -> Result<Cliente, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO tb_cliente (nome, cnpj, segmento, cep, endereco, numero, bairro, cidade, estado)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {CLIENTE_COLUMNS}"
        ))
        .bind(&cliente.nome)
        .bind(&cliente.cnpj)
        .bind(&cliente.segmento)
        .bind(&cliente.cep)
        .bind(&cliente.endereco)
        .bind(&cliente.numero)
        .bind(&cliente.bairro)
        .bind(&cliente.cidade)
        .bind(&cliente.estado)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row_to_cliente(&row)
    }

    async fn update(
        &self,
        id: ClienteId,
        cliente: NewCliente,
    ) -> Result<Option<Cliente>, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE tb_cliente
             SET nome = ?, cnpj = ?, segmento = ?, cep = ?, endereco = ?,
                 numero = ?, bairro = ?, cidade = ?, estado = ?
             WHERE id = ?
             RETURNING {CLIENTE_COLUMNS}"
        ))
        .bind(&cliente.nome)
        .bind(&cliente.cnpj)
        .bind(&cliente.segmento)
        .bind(&cliente.cep)
        .bind(&cliente.endereco)
        .bind(&cliente.numero)
        .bind(&cliente.bairro)
        .bind(&cliente.cidade)
        .bind(&cliente.estado)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        match row {
            Some(ref r) => Ok(Some(row_to_cliente(r)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ClienteId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tb_cliente WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
