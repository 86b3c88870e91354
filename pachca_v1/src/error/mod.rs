pub mod pachca_error;

pub use pachca_error::{PachcaError, Result};
