pub mod config;
pub mod domain;
pub mod errors;
pub mod validation;

pub use domain::cliente::{Cliente, ClienteDraft, ClienteId, NewCliente, UniqueField};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use validation::{validate, Field, FieldRule, Rule, Violations};
