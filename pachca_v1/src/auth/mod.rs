pub mod oauth;
pub mod token;

pub use oauth::TokenAuthority;
pub use token::{GrantType, RefreshStore};
