pub mod env;

pub use env::PachcaConfig;
