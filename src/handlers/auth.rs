// src/handlers/auth.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::crud::body,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequirePerfil, SomentePrestador},
    },
    models::auth::{
        CriarFuncionarioLoginPayload, LoginPayload, RegistrarPrestadorPayload, TokenResponse,
        UsuarioDto,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/registrar",
    tag = "Auth",
    request_body = RegistrarPrestadorPayload,
    responses(
        (status = 200, description = "Prestador e login do dono criados", body = TokenResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn registrar(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<RegistrarPrestadorPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut payload = body(payload).map_err(to_api)?;
    payload.prestador.normalizar();
    payload.email = payload.email.trim().to_lowercase();
    payload.validate().map_err(|e| to_api(e.into()))?;

    let token = app_state
        .auth_service
        .register_prestador(payload)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::OK, Json(token)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token gerado", body = TokenResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas ou usuário desativado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let payload = body(payload).map_err(to_api)?;
    payload.validate().map_err(|e| to_api(e.into()))?;

    let token = app_state
        .auth_service
        .login_user(&payload.email.trim().to_lowercase(), &payload.senha)
        .await
        .map_err(to_api)?;

    Ok((StatusCode::OK, Json(token)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = UsuarioDto),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let usuario = app_state
        .auth_service
        .get_user_by_email(&user.0.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(UsuarioDto::from(usuario))))
}

#[utoipa::path(
    post,
    path = "/api/auth/funcionario",
    tag = "Auth",
    request_body = CriarFuncionarioLoginPayload,
    responses(
        (status = 200, description = "Login do funcionário criado", body = UsuarioDto),
        (status = 400, description = "Dados inválidos ou funcionário de outro prestador"),
        (status = 403, description = "Apenas o prestador pode criar logins"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_funcionario(
    State(app_state): State<AppState>,
    locale: Locale,
    RequirePerfil(user, _): RequirePerfil<SomentePrestador>,
    payload: Result<Json<CriarFuncionarioLoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut payload = body(payload).map_err(to_api)?;
    payload.email = payload.email.trim().to_lowercase();
    payload.validate().map_err(|e| to_api(e.into()))?;

    let usuario = app_state
        .auth_service
        .create_funcionario_login(payload, &user.carimbo())
        .await
        .map_err(to_api)?;

    Ok((StatusCode::OK, Json(UsuarioDto::from(usuario))))
}
