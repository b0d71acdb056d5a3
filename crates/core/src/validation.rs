//! Field rules for cliente records.
//!
//! One rule set serves both consumers: the HTTP layer only needs the first
//! violation, the web form shows every violation next to its input. The rules
//! are serialisable so the browser evaluates exactly the same table.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::cliente::{ClienteDraft, NewCliente};

pub const REQUIRED_MESSAGE: &str = "Todos os campos (nome, cnpj, segmento, cep, endereco, numero, bairro, cidade, estado) são obrigatórios.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Nome,
    Cnpj,
    Segmento,
    Cep,
    Endereco,
    Numero,
    Bairro,
    Cidade,
    Estado,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Nome,
        Field::Cnpj,
        Field::Segmento,
        Field::Cep,
        Field::Endereco,
        Field::Numero,
        Field::Bairro,
        Field::Cidade,
        Field::Estado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nome => "nome",
            Self::Cnpj => "cnpj",
            Self::Segmento => "segmento",
            Self::Cep => "cep",
            Self::Endereco => "endereco",
            Self::Numero => "numero",
            Self::Bairro => "bairro",
            Self::Cidade => "cidade",
            Self::Estado => "estado",
        }
    }

    fn value(self, draft: &ClienteDraft) -> Option<&Value> {
        let slot = match self {
            Self::Nome => &draft.nome,
            Self::Cnpj => &draft.cnpj,
            Self::Segmento => &draft.segmento,
            Self::Cep => &draft.cep,
            Self::Endereco => &draft.endereco,
            Self::Numero => &draft.numero,
            Self::Bairro => &draft.bairro,
            Self::Cidade => &draft.cidade,
            Self::Estado => &draft.estado,
        };
        slot.as_ref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "len", rename_all = "snake_case")]
pub enum Rule {
    /// At least `n` characters.
    MinChars(usize),
    /// Exactly `n` ASCII digits.
    Digits(usize),
    /// Exactly `n` ASCII uppercase letters.
    UpperLetters(usize),
}

impl Rule {
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::MinChars(min) => value.chars().count() >= min,
            Self::Digits(len) => value.len() == len && value.bytes().all(|b| b.is_ascii_digit()),
            Self::UpperLetters(len) => {
                value.len() == len && value.bytes().all(|b| b.is_ascii_uppercase())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: Field,
    pub rule: Rule,
    pub message: &'static str,
}

pub const RULES: [FieldRule; 9] = [
    FieldRule {
        field: Field::Nome,
        rule: Rule::MinChars(3),
        message: "O nome do cliente deve ser uma string com pelo menos 3 caracteres.",
    },
    FieldRule {
        field: Field::Cnpj,
        rule: Rule::Digits(14),
        message: "O CNPJ deve ser uma string com 14 dígitos numéricos.",
    },
    FieldRule {
        field: Field::Segmento,
        rule: Rule::MinChars(2),
        message: "O segmento deve ser uma string com pelo menos 2 caracteres.",
    },
    FieldRule {
        field: Field::Cep,
        rule: Rule::Digits(8),
        message: "O CEP deve ser uma string com 8 dígitos numéricos.",
    },
    FieldRule {
        field: Field::Endereco,
        rule: Rule::MinChars(3),
        message: "O endereço deve ser uma string com pelo menos 3 caracteres.",
    },
    FieldRule {
        field: Field::Numero,
        rule: Rule::MinChars(1),
        message: "O número deve ser uma string não vazia.",
    },
    FieldRule {
        field: Field::Bairro,
        rule: Rule::MinChars(3),
        message: "O bairro deve ser uma string com pelo menos 3 caracteres.",
    },
    FieldRule {
        field: Field::Cidade,
        rule: Rule::MinChars(3),
        message: "A cidade deve ser uma string com pelo menos 3 caracteres.",
    },
    FieldRule {
        field: Field::Estado,
        rule: Rule::UpperLetters(2),
        message: "O estado deve ser uma string com exatamente 2 letras maiúsculas (UF).",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub message: &'static str,
}

/// Every rule a draft broke, in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations {
    missing: Vec<Field>,
    violations: Vec<Violation>,
}

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.violations.is_empty()
    }

    pub fn missing(&self) -> &[Field] {
        &self.missing
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Short-circuit answer: the presence rule wins, then the first field
    /// rule in table order.
    pub fn first_message(&self) -> &'static str {
        if !self.missing.is_empty() {
            return REQUIRED_MESSAGE;
        }
        self.violations.first().map(|violation| violation.message).unwrap_or(REQUIRED_MESSAGE)
    }

    /// Aggregate answer keyed by field name, for inline form errors.
    pub fn by_field(&self) -> BTreeMap<&'static str, &'static str> {
        self.violations.iter().map(|violation| (violation.field.as_str(), violation.message)).collect()
    }
}

/// Mirrors the truthiness check the form applies before any field rule.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

pub fn validate(draft: &ClienteDraft) -> Result<NewCliente, Violations> {
    let mut report = Violations::default();
    let mut accepted: Vec<String> = Vec::with_capacity(RULES.len());

    for rule in RULES.iter() {
        let value = rule.field.value(draft);
        if is_blank(value) {
            report.missing.push(rule.field);
        }

        match value.and_then(Value::as_str) {
            Some(text) if rule.rule.accepts(text) => accepted.push(text.to_string()),
            _ => report.violations.push(Violation { field: rule.field, message: rule.message }),
        }
    }

    if !report.is_empty() {
        return Err(report);
    }

    let mut values = accepted.into_iter();
    let mut next = || values.next().unwrap_or_default();
    Ok(NewCliente {
        nome: next(),
        cnpj: next(),
        segmento: next(),
        cep: next(),
        endereco: next(),
        numero: next(),
        bairro: next(),
        cidade: next(),
        estado: next(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{validate, Field, Rule, REQUIRED_MESSAGE, RULES};
    use crate::domain::cliente::{ClienteDraft, NewCliente};

    fn valid() -> NewCliente {
        NewCliente {
            nome: "Mercado Bom Preço".to_string(),
            cnpj: "12345678000195".to_string(),
            segmento: "Varejo".to_string(),
            cep: "01310100".to_string(),
            endereco: "Avenida Paulista".to_string(),
            numero: "1000".to_string(),
            bairro: "Bela Vista".to_string(),
            cidade: "São Paulo".to_string(),
            estado: "SP".to_string(),
        }
    }

    #[test]
    fn valid_draft_yields_new_cliente_in_field_order() {
        let expected = valid();
        let accepted = validate(&ClienteDraft::from(&expected)).expect("draft should validate");
        assert_eq!(accepted, expected);
    }

    #[test]
    fn missing_field_reports_presence_message_first() {
        let mut draft = ClienteDraft::from(&valid());
        draft.bairro = None;
        draft.cnpj = Some(json!("123"));

        let violations = validate(&draft).expect_err("missing bairro must fail");
        assert_eq!(violations.first_message(), REQUIRED_MESSAGE);
        assert_eq!(violations.missing(), &[Field::Bairro]);
    }

    #[test]
    fn empty_string_and_null_count_as_missing() {
        let mut draft = ClienteDraft::from(&valid());
        draft.nome = Some(json!(""));
        draft.estado = Some(Value::Null);

        let violations = validate(&draft).expect_err("blank fields must fail");
        assert_eq!(violations.missing(), &[Field::Nome, Field::Estado]);
        assert_eq!(violations.first_message(), REQUIRED_MESSAGE);
    }

    #[test]
    fn invalid_cnpj_is_rejected_even_when_everything_else_is_valid() {
        for cnpj in ["1234567800019", "123456780001955", "12.345.678/0001", "abcdefghijklmn"] {
            let mut draft = ClienteDraft::from(&valid());
            draft.cnpj = Some(json!(cnpj));

            let violations = validate(&draft).expect_err("bad cnpj must fail");
            assert_eq!(
                violations.first_message(),
                "O CNPJ deve ser uma string com 14 dígitos numéricos."
            );
        }
    }

    #[test]
    fn non_string_value_fails_its_field_rule() {
        let mut draft = ClienteDraft::from(&valid());
        draft.cnpj = Some(json!(12345678000195_u64));

        let violations = validate(&draft).expect_err("numeric cnpj must fail");
        assert!(violations.missing().is_empty());
        assert_eq!(
            violations.first_message(),
            "O CNPJ deve ser uma string com 14 dígitos numéricos."
        );
    }

    #[test]
    fn first_message_follows_table_order_while_by_field_aggregates() {
        let mut draft = ClienteDraft::from(&valid());
        draft.estado = Some(json!("sp"));
        draft.cep = Some(json!("0131"));
        draft.nome = Some(json!("Ab"));

        let violations = validate(&draft).expect_err("three rules broken");
        assert_eq!(
            violations.first_message(),
            "O nome do cliente deve ser uma string com pelo menos 3 caracteres."
        );

        let by_field = violations.by_field();
        assert_eq!(by_field.len(), 3);
        assert!(by_field.contains_key("nome"));
        assert!(by_field.contains_key("cep"));
        assert_eq!(
            by_field.get("estado").copied(),
            Some("O estado deve ser uma string com exatamente 2 letras maiúsculas (UF).")
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        assert!(Rule::MinChars(3).accepts("Açú"));
        assert!(!Rule::MinChars(3).accepts("Aç"));
    }

    #[test]
    fn numero_accepts_free_text() {
        let mut draft = ClienteDraft::from(&valid());
        draft.numero = Some(json!("S/N"));
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn rules_serialize_for_the_browser() {
        let rules: Value = serde_json::to_value(RULES).expect("rules json");
        assert_eq!(rules.as_array().map(Vec::len), Some(9));
        assert_eq!(rules[1]["field"], "cnpj");
        assert_eq!(rules[1]["rule"]["kind"], "digits");
        assert_eq!(rules[1]["rule"]["len"], 14);
    }
}
