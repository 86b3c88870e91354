// Biblioteca da CLI do Pachca
// Expõe módulos para uso em testes e no binário

pub mod commands;
pub mod config;
pub mod utils;
