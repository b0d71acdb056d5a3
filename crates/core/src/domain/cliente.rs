use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClienteId(pub i64);

impl fmt::Display for ClienteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a path segment is not a plain decimal integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidClienteId(pub String);

impl FromStr for ClienteId {
    type Err = InvalidClienteId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidClienteId(raw.to_string()));
        }

        trimmed.parse::<i64>().map(ClienteId).map_err(|_| InvalidClienteId(raw.to_string()))
    }
}

/// A persisted row of `tb_cliente`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: ClienteId,
    pub created_at: DateTime<Utc>,
    pub nome: String,
    pub cnpj: String,
    pub segmento: String,
    pub cep: String,
    pub endereco: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
}

/// The nine business fields, already validated. Used for both insert and
/// full replacement on update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCliente {
    pub nome: String,
    pub cnpj: String,
    pub segmento: String,
    pub cep: String,
    pub endereco: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
}

impl NewCliente {
    pub fn into_cliente(self, id: ClienteId, created_at: DateTime<Utc>) -> Cliente {
        Cliente {
            id,
            created_at,
            nome: self.nome,
            cnpj: self.cnpj,
            segmento: self.segmento,
            cep: self.cep,
            endereco: self.endereco,
            numero: self.numero,
            bairro: self.bairro,
            cidade: self.cidade,
            estado: self.estado,
        }
    }
}

/// Untrusted request body. Every field stays a raw JSON value until the
/// validator has checked presence and type; `id` and `created_at` are ignored.
/// A `null` field counts as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClienteDraft {
    pub nome: Option<Value>,
    pub cnpj: Option<Value>,
    pub segmento: Option<Value>,
    pub cep: Option<Value>,
    pub endereco: Option<Value>,
    pub numero: Option<Value>,
    pub bairro: Option<Value>,
    pub cidade: Option<Value>,
    pub estado: Option<Value>,
}

impl<'de> Deserialize<'de> for ClienteDraft {
    /// Fields are read by name only, so a positional array is refused
    /// instead of being mapped onto the fields in declaration order.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let mut take = |name: &str| object.remove(name).filter(|value| !value.is_null());

        Ok(Self {
            nome: take("nome"),
            cnpj: take("cnpj"),
            segmento: take("segmento"),
            cep: take("cep"),
            endereco: take("endereco"),
            numero: take("numero"),
            bairro: take("bairro"),
            cidade: take("cidade"),
            estado: take("estado"),
        })
    }
}

impl From<&NewCliente> for ClienteDraft {
    fn from(cliente: &NewCliente) -> Self {
        let text = |value: &str| Some(Value::String(value.to_string()));
        Self {
            nome: text(&cliente.nome),
            cnpj: text(&cliente.cnpj),
            segmento: text(&cliente.segmento),
            cep: text(&cliente.cep),
            endereco: text(&cliente.endereco),
            numero: text(&cliente.numero),
            bairro: text(&cliente.bairro),
            cidade: text(&cliente.cidade),
            estado: text(&cliente.estado),
        }
    }
}

/// Columns guarded by a uniqueness constraint in `tb_cliente`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    Nome,
    Cnpj,
}

impl UniqueField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Nome => "nome",
            Self::Cnpj => "cnpj",
        }
    }

    pub fn constraint_name(self) -> &'static str {
        match self {
            Self::Nome => "tb_cliente_nome_key",
            Self::Cnpj => "tb_cliente_cnpj_key",
        }
    }

    pub fn conflict_message(self) -> &'static str {
        match self {
            Self::Nome => "Nome já cadastrado.",
            Self::Cnpj => "CNPJ já cadastrado.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClienteDraft, ClienteId, InvalidClienteId};

    #[test]
    fn cliente_id_parses_plain_integers() {
        assert_eq!("42".parse::<ClienteId>(), Ok(ClienteId(42)));
        assert_eq!(" 7 ".parse::<ClienteId>(), Ok(ClienteId(7)));
        assert_eq!("-3".parse::<ClienteId>(), Ok(ClienteId(-3)));
    }

    #[test]
    fn cliente_id_rejects_non_numeric_segments() {
        for raw in ["abc", "12abc", "", "1.5", "-", "99999999999999999999"] {
            assert_eq!(raw.parse::<ClienteId>(), Err(InvalidClienteId(raw.to_string())));
        }
    }

    #[test]
    fn draft_ignores_read_only_fields() {
        let draft: ClienteDraft = serde_json::from_value(serde_json::json!({
            "id": 10,
            "created_at": "2026-01-01T00:00:00Z",
            "nome": "Padaria Central",
        }))
        .expect("draft should deserialize");

        assert_eq!(draft.nome, Some(serde_json::json!("Padaria Central")));
        assert_eq!(draft.cnpj, None);
    }

    #[test]
    fn draft_treats_null_fields_as_absent() {
        let draft: ClienteDraft =
            serde_json::from_value(serde_json::json!({ "nome": null, "cep": "01310100" }))
                .expect("draft should deserialize");

        assert_eq!(draft.nome, None);
        assert_eq!(draft.cep, Some(serde_json::json!("01310100")));
    }

    #[test]
    fn draft_refuses_positional_arrays() {
        let positional = serde_json::json!([
            "Loja Posicional",
            "11111111000111",
            "Varejo",
            "01310100",
            "Rua A",
            "1",
            "Centro",
            "Santos",
            "SP"
        ]);

        assert!(serde_json::from_value::<ClienteDraft>(positional).is_err());
        assert!(serde_json::from_value::<ClienteDraft>(serde_json::json!("nome")).is_err());
    }
}
