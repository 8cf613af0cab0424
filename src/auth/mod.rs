pub mod cookies;
pub mod handlers;
pub mod pkce;
