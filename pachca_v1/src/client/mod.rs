pub mod api;
pub mod entities;

pub use api::{ApiMethod, ApiResponse, PachcaClient};
