// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Perfil,
};

/// O perfil exigido por uma rota.
pub trait PerfilDef: Send + Sync + 'static {
    fn perfil() -> Perfil;
}

/// Só o dono do prestador.
pub struct SomentePrestador;

impl PerfilDef for SomentePrestador {
    fn perfil() -> Perfil {
        Perfil::Prestador
    }
}

/// Guardião: rejeita com 403 quem não tem o perfil `T`.
/// Entrega o usuário já extraído.
pub struct RequirePerfil<T>(pub AuthenticatedUser, pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePerfil<T>
where
    T: PerfilDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if let Err(e) = user.require_perfil(T::perfil()) {
            tracing::info!(usuario = %user.0.id, perfil = ?user.0.perfil, "acesso negado: exige {:?}", T::perfil());
            let app_state = AppState::from_ref(state);
            return Err(e.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store));
        }

        Ok(RequirePerfil(user, PhantomData))
    }
}
