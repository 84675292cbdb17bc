pub mod auth;
pub mod crud;
pub mod prestador;
