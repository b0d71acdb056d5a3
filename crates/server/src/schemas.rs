//! OpenAPI schemas for the cliente records.
//!
//! The domain types in `cadastro-core` do not depend on utoipa. These
//! wrappers mirror their JSON shape and are only read by the doc generator.

use utoipa::ToSchema;

/// A stored cliente, as returned by every successful read or write.
#[derive(ToSchema)]
#[schema(as = Cliente)]
#[allow(dead_code)]
pub struct ClienteSchema {
    #[schema(example = 1)]
    id: i64,
    /// Assigned by the datastore on insert.
    #[schema(value_type = String, format = DateTime, example = "2025-09-17T12:00:00Z")]
    created_at: String,
    #[schema(example = "Empresa XYZ")]
    nome: String,
    #[schema(example = "12345678000195")]
    cnpj: String,
    #[schema(example = "Varejo")]
    segmento: String,
    #[schema(example = "12345678")]
    cep: String,
    #[schema(example = "Rua Principal")]
    endereco: String,
    #[schema(example = "100")]
    numero: String,
    #[schema(example = "Centro")]
    bairro: String,
    #[schema(example = "São Paulo")]
    cidade: String,
    #[schema(example = "SP")]
    estado: String,
}

/// Body accepted by create and update. `id` and `created_at` are ignored if sent.
#[derive(ToSchema)]
#[schema(as = ClienteInput)]
#[allow(dead_code)]
pub struct ClienteInputSchema {
    /// At least 3 characters.
    #[schema(example = "Empresa XYZ", min_length = 3)]
    nome: String,
    /// Exactly 14 digits.
    #[schema(example = "12345678000195", pattern = "^[0-9]{14}$")]
    cnpj: String,
    #[schema(example = "Varejo", min_length = 2)]
    segmento: String,
    /// Exactly 8 digits.
    #[schema(example = "12345678", pattern = "^[0-9]{8}$")]
    cep: String,
    #[schema(example = "Rua Principal", min_length = 3)]
    endereco: String,
    #[schema(example = "100", min_length = 1)]
    numero: String,
    #[schema(example = "Centro", min_length = 3)]
    bairro: String,
    #[schema(example = "São Paulo", min_length = 3)]
    cidade: String,
    /// Two upper-case letters (UF).
    #[schema(example = "SP", pattern = "^[A-Z]{2}$")]
    estado: String,
}
