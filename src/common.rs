pub mod error;
pub mod formatacao;
pub mod i18n;
