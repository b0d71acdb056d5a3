use cadastro_core::domain::cliente::NewCliente;
use serde::Serialize;

use crate::connection::DbPool;
use crate::repositories::{ClienteRepository, RepositoryError, SqlClienteRepository};

struct DemoContract {
    nome: &'static str,
    cnpj: &'static str,
    segmento: &'static str,
    cep: &'static str,
    endereco: &'static str,
    numero: &'static str,
    bairro: &'static str,
    cidade: &'static str,
    estado: &'static str,
}

/// Deterministic demo records for local development and smoke runs.
const DEMO_CLIENTES: &[DemoContract] = &[
    DemoContract {
        nome: "Padaria Pão Dourado",
        cnpj: "11222333000181",
        segmento: "Alimentação",
        cep: "01310100",
        endereco: "Avenida Paulista",
        numero: "1578",
        bairro: "Bela Vista",
        cidade: "São Paulo",
        estado: "SP",
    },
    DemoContract {
        nome: "Ferragens Horizonte",
        cnpj: "45997418000153",
        segmento: "Construção",
        cep: "30130010",
        endereco: "Rua da Bahia",
        numero: "904",
        bairro: "Centro",
        cidade: "Belo Horizonte",
        estado: "MG",
    },
    DemoContract {
        nome: "Clínica Vida Plena",
        cnpj: "27865757000102",
        segmento: "Saúde",
        cep: "40020000",
        endereco: "Rua Chile",
        numero: "S/N",
        bairro: "Comércio",
        cidade: "Salvador",
        estado: "BA",
    },
];

impl DemoContract {
    fn to_new_cliente(&self) -> NewCliente {
        NewCliente {
            nome: self.nome.to_string(),
            cnpj: self.cnpj.to_string(),
            segmento: self.segmento.to_string(),
            cep: self.cep.to_string(),
            endereco: self.endereco.to_string(),
            numero: self.numero.to_string(),
            bairro: self.bairro.to_string(),
            cidade: self.cidade.to_string(),
            estado: self.estado.to_string(),
        }
    }
}

pub struct DemoClientes;

impl DemoClientes {
    pub fn records() -> Vec<NewCliente> {
        DEMO_CLIENTES.iter().map(DemoContract::to_new_cliente).collect()
    }

    /// Inserts every demo record. A record whose `cnpj` already exists is
    /// counted as skipped, so the load can be repeated. A record whose `nome`
    /// is held by a different cliente is reported as blocked.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let repository = SqlClienteRepository::new(pool.clone());
        let mut result = SeedResult::default();

        for contract in DEMO_CLIENTES {
            match repository.create(contract.to_new_cliente()).await {
                Ok(_) => result.inserted.push(contract.cnpj),
                Err(RepositoryError::UniqueViolation(_)) => {
                    if rows_with_cnpj(pool, contract.cnpj).await? > 0 {
                        result.skipped.push(contract.cnpj);
                    } else {
                        result.blocked.push(contract.cnpj);
                    }
                }
                Err(error) => return Err(error),
            }
        }

        Ok(result)
    }

    /// A demo record counts as present when its `cnpj` or its `nome` is
    /// stored, the same rule that makes `load` leave it out.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(DEMO_CLIENTES.len());

        for contract in DEMO_CLIENTES {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM tb_cliente WHERE cnpj = ? OR nome = ?")
                    .bind(contract.cnpj)
                    .bind(contract.nome)
                    .fetch_one(pool)
                    .await?;
            checks.push((contract.cnpj, count > 0));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}

async fn rows_with_cnpj(pool: &DbPool, cnpj: &str) -> Result<i64, RepositoryError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_cliente WHERE cnpj = ?")
        .bind(cnpj)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub inserted: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    /// Demo cnpjs not inserted because another cliente already uses the `nome`.
    pub blocked: Vec<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use cadastro_core::domain::cliente::ClienteDraft;
    use cadastro_core::validation::validate;

    use super::DemoClientes;
    use crate::repositories::{ClienteRepository, SqlClienteRepository};
    use crate::{connect_with_settings, migrations};

    #[test]
    fn demo_records_pass_validation() {
        for record in DemoClientes::records() {
            let accepted = validate(&ClienteDraft::from(&record));
            assert_eq!(accepted, Ok(record));
        }
    }

    #[tokio::test]
    async fn load_is_repeatable_and_verifiable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let first = DemoClientes::load(&pool).await.expect("first load");
        assert_eq!(first.inserted.len(), 3);
        assert!(first.skipped.is_empty());

        let second = DemoClientes::load(&pool).await.expect("second load");
        assert!(second.inserted.is_empty());
        assert_eq!(second.skipped.len(), 3);

        let verification = DemoClientes::verify(&pool).await.expect("verify");
        assert!(verification.all_present);
    }

    #[tokio::test]
    async fn nome_taken_by_another_cliente_is_reported_as_blocked() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let mut homonym = DemoClientes::records().remove(0);
        homonym.cnpj = "99888777000166".to_string();
        SqlClienteRepository::new(pool.clone()).create(homonym).await.expect("homonym insert");

        let seeded = DemoClientes::load(&pool).await.expect("load");
        assert_eq!(seeded.inserted, vec!["45997418000153", "27865757000102"]);
        assert!(seeded.skipped.is_empty());
        assert_eq!(seeded.blocked, vec!["11222333000181"]);

        let verification = DemoClientes::verify(&pool).await.expect("verify");
        assert!(verification.all_present);
    }
}
