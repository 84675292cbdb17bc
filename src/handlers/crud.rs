// src/handlers/crud.rs
//
// Um único conjunto de handlers para todos os cadastros. Cada rota é
// instanciada com o recurso concreto (`create::<Cliente>`) em `routes.rs`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::auth::Perfil,
    services::crud::{CrudResource, CrudService},
};

fn service<R: CrudResource>(app_state: &AppState) -> CrudService<R> {
    CrudService::new(app_state.db_pool.clone())
}

// Corpo malformado também responde 400 no formato de erro da API.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidBody(rejection.body_text()))
}

fn path_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id).map_err(|rejection| AppError::InvalidParameter {
        campo: "id",
        motivo: rejection.body_text(),
    })
}

fn query<T>(filter: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    filter.map(|Query(filter)| filter).map_err(|rejection| AppError::InvalidParameter {
        campo: "query",
        motivo: rejection.body_text(),
    })
}

fn can_write<R: CrudResource>(user: &AuthenticatedUser) -> Result<(), AppError> {
    if R::OWNER_ONLY_WRITE {
        user.require_perfil(Perfil::Prestador)?;
    }
    Ok(())
}

// Normaliza e valida, nessa ordem: os validadores contam dígitos já sem pontuação.
fn prepare<R: CrudResource>(
    user: &AuthenticatedUser,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<R::Dto, AppError> {
    can_write::<R>(user)?;
    let mut dto = body(payload)?;
    R::normalize(&mut dto);
    dto.validate()?;
    Ok(dto)
}

fn found_or_no_content<T: serde::Serialize>(value: Option<T>) -> Response {
    match value {
        Some(v) => (StatusCode::OK, Json(v)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn create<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let dto = prepare::<R>(&user, payload).map_err(to_api)?;
    let created = service::<R>(&app_state)
        .create(dto, &user.carimbo())
        .await
        .map_err(to_api)?;

    Ok((StatusCode::OK, Json(created)).into_response())
}

pub async fn list<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    filter: Result<Query<R::Filter>, QueryRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let filter = query(filter).map_err(to_api)?;
    let items = service::<R>(&app_state)
        .list(tenant.0, &filter)
        .await
        .map_err(to_api)?;

    if items.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok((StatusCode::OK, Json(items)).into_response())
}

pub async fn get_by_id<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let id = path_id(id).map_err(to_api)?;
    let found = service::<R>(&app_state)
        .find_by_id(tenant.0, id)
        .await
        .map_err(to_api)?;

    Ok(found_or_no_content(found))
}

pub async fn update<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let dto = prepare::<R>(&user, payload).map_err(to_api)?;
    let updated = service::<R>(&app_state)
        .update(dto, &user.carimbo())
        .await
        .map_err(to_api)?;

    Ok(found_or_no_content(updated))
}

pub async fn disable<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    can_write::<R>(&user).map_err(to_api)?;
    let id = path_id(id).map_err(to_api)?;
    let disabled = service::<R>(&app_state)
        .disable(id, &user.carimbo())
        .await
        .map_err(to_api)?;

    Ok(found_or_no_content(disabled))
}

pub async fn delete<R: CrudResource>(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    can_write::<R>(&user).map_err(to_api)?;
    let id = path_id(id).map_err(to_api)?;
    let deleted = service::<R>(&app_state)
        .delete(user.0.prestador_id, id)
        .await
        .map_err(to_api)?;

    if !deleted {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    tracing::info!(tabela = R::TABLE, %id, usuario = %user.0.id, "registro excluído");
    Ok((StatusCode::OK, Json(json!({ "mensagem": "Deletado" }))).into_response())
}
