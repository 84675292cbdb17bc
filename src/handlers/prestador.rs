// src/handlers/prestador.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::crud::body,
    middleware::{
        i18n::Locale,
        rbac::{RequirePerfil, SomentePrestador},
        tenancy::TenantContext,
    },
    models::prestador::{Prestador, PrestadorDto},
};

fn found_or_no_content(prestador: Option<Prestador>) -> Response {
    match prestador {
        Some(p) => (StatusCode::OK, Json(PrestadorDto::from(p))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/prestador",
    tag = "Prestador",
    responses(
        (status = 200, description = "Dados do prestador do usuário logado", body = PrestadorDto),
        (status = 204, description = "Prestador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_prestador(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<Response, ApiError> {
    let prestador = app_state
        .prestador_repo
        .find_by_id(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(found_or_no_content(prestador))
}

#[utoipa::path(
    put,
    path = "/api/prestador",
    tag = "Prestador",
    request_body = PrestadorDto,
    responses(
        (status = 200, description = "Prestador atualizado", body = PrestadorDto),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o prestador pode alterar o cadastro")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_prestador(
    State(app_state): State<AppState>,
    locale: Locale,
    RequirePerfil(user, _): RequirePerfil<SomentePrestador>,
    payload: Result<Json<PrestadorDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut dto = body(payload).map_err(to_api)?;
    dto.normalizar();
    dto.validate().map_err(|e| to_api(e.into()))?;

    // O id do corpo é ignorado: só se altera o próprio prestador.
    let carimbo = user.carimbo();
    let prestador = Prestador::from_dto(dto, carimbo.prestador_id, &carimbo);
    let updated = app_state
        .prestador_repo
        .update(&prestador)
        .await
        .map_err(to_api)?;

    Ok(found_or_no_content(updated))
}

#[utoipa::path(
    put,
    path = "/api/prestador/desativar",
    tag = "Prestador",
    responses(
        (status = 200, description = "Prestador desativado", body = PrestadorDto),
        (status = 403, description = "Apenas o prestador pode desativar o cadastro")
    ),
    security(("api_jwt" = []))
)]
pub async fn disable_prestador(
    State(app_state): State<AppState>,
    locale: Locale,
    RequirePerfil(user, _): RequirePerfil<SomentePrestador>,
) -> Result<Response, ApiError> {
    let disabled = app_state
        .prestador_repo
        .disable(&user.carimbo())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if disabled.is_some() {
        tracing::info!(prestador = %user.0.prestador_id, usuario = %user.0.id, "Prestador desativado");
    }
    Ok(found_or_no_content(disabled))
}
