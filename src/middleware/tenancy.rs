// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::UsuarioAutenticado,
};

// O prestador (tenant) de quem chama. Sai sempre do token validado pelo
// `auth_guard`; cabeçalho ou corpo da requisição não têm voz aqui.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<UsuarioAutenticado>() {
            Some(usuario) => Ok(TenantContext(usuario.prestador_id)),
            None => {
                let app_state = AppState::from_ref(state);
                Err(AppError::InvalidToken
                    .to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store))
            }
        }
    }
}
