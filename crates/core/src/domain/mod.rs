pub mod cliente;
