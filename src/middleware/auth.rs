// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auditoria::Carimbo,
        auth::{Perfil, UsuarioAutenticado},
    },
};

// Valida o Bearer e guarda o usuário nos extensions da requisição.
// Não consulta o banco: tudo o que os handlers precisam vem nas claims.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let usuario = bearer
        .map_err(|_| AppError::InvalidToken)
        .and_then(|TypedHeader(auth)| app_state.auth_service.validate_token(auth.token()))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::debug!(usuario = %usuario.id, prestador = %usuario.prestador_id, "requisição autenticada");

    request.extensions_mut().insert(usuario);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UsuarioAutenticado);

impl AuthenticatedUser {
    pub fn carimbo(&self) -> Carimbo {
        self.0.carimbo()
    }

    pub fn require_perfil(&self, perfil: Perfil) -> Result<(), AppError> {
        if self.0.perfil == perfil {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioAutenticado>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                let app_state = AppState::from_ref(state);
                AppError::InvalidToken
                    .to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
            })
    }
}
