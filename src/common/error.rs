// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros de domínio e de infraestrutura. Os handlers nunca devolvem AppError
// diretamente: convertem para ApiError com `to_api_error`, já traduzido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // JSON malformado ou com tipos errados
    #[error("Corpo inválido: {0}")]
    InvalidBody(String),

    // Id na rota ou filtro de query que não deserializa
    #[error("Parâmetro inválido: {campo}")]
    InvalidParameter { campo: &'static str, motivo: String },

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário desativado")]
    UserDisabled,

    #[error("Perfil sem permissão para esta operação")]
    Forbidden,

    // Exclusão bloqueada por chave estrangeira
    #[error("Registro em uso")]
    RecordInUse,

    // Inserção/atualização apontando para registro inexistente ou de outro prestador
    #[error("Referência inválida")]
    InvalidReference,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Chave usada para buscar a mensagem traduzida no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::InvalidParameter { .. } => "invalid_parameter",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::UserDisabled => "user_disabled",
            AppError::Forbidden => "forbidden",
            AppError::RecordInUse => "record_in_use",
            AppError::InvalidReference => "invalid_reference",
            AppError::UniqueConstraintViolation(_) => "unique_violation",
            _ => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidParameter { .. }
            | AppError::RecordInUse
            | AppError::InvalidReference => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::UniqueConstraintViolation(_) => {
                StatusCode::CONFLICT
            }
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::UserDisabled => {
                StatusCode::UNAUTHORIZED
            }
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro na resposta HTTP, com a mensagem no idioma pedido.
    /// Detalhes internos (mensagens do driver, do bcrypt...) só vão para o log.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let error = store.translate(&locale.0, self.message_key()).to_string();

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            AppError::InvalidBody(reason) => Some(json!({ "body": reason })),
            AppError::InvalidParameter { campo, motivo } => {
                let mut details = serde_json::Map::new();
                details.insert(campo.to_string(), json!([motivo]));
                Some(Value::Object(details))
            }
            AppError::UniqueConstraintViolation(constraint) => {
                Some(json!({ "constraint": constraint }))
            }
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                None
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

// Campo -> lista de mensagens, no formato que o frontend já consome.
// Structs aninhadas viram "pai.campo".
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    collect_messages(errors, None, &mut details);
    json!(details)
}

fn collect_messages(
    errors: &validator::ValidationErrors,
    prefix: Option<&str>,
    details: &mut HashMap<String, Vec<String>>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let key = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                details.entry(key).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, Some(&key), details),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(inner, Some(&format!("{key}[{index}]")), details);
                }
            }
        }
    }
}

// A rejeição padrão dos handlers e extratores.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
