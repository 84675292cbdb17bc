// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens de erro por idioma. Chaves vêm de `AppError::message_key`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let pt = HashMap::from([
            ("validation", "Um ou mais campos são inválidos."),
            ("invalid_body", "O corpo da requisição é inválido."),
            ("invalid_parameter", "Parâmetro da requisição inválido."),
            ("email_already_exists", "Este e-mail já está em uso."),
            ("invalid_credentials", "E-mail ou senha inválidos."),
            ("invalid_token", "Token de autenticação inválido ou ausente."),
            ("user_not_found", "Usuário não encontrado."),
            ("user_disabled", "Usuário desativado."),
            ("forbidden", "Seu perfil não permite realizar esta ação."),
            ("record_in_use", "O registro está em uso por outro cadastro e não pode ser excluído."),
            ("invalid_reference", "O registro referenciado não existe para este prestador."),
            ("unique_violation", "Já existe um registro com estes dados."),
            ("internal", "Ocorreu um erro inesperado."),
        ]);

        let en = HashMap::from([
            ("validation", "One or more fields are invalid."),
            ("invalid_body", "The request body is invalid."),
            ("invalid_parameter", "Invalid request parameter."),
            ("email_already_exists", "This e-mail is already in use."),
            ("invalid_credentials", "Invalid e-mail or password."),
            ("invalid_token", "Invalid or missing authentication token."),
            ("user_not_found", "User not found."),
            ("user_disabled", "User is disabled."),
            ("forbidden", "Your profile is not allowed to perform this action."),
            ("record_in_use", "The record is referenced by another record and cannot be deleted."),
            ("invalid_reference", "The referenced record does not exist for this provider."),
            ("unique_violation", "A record with this data already exists."),
            ("internal", "An unexpected error occurred."),
        ]);

        Self {
            messages: HashMap::from([("pt", pt), ("en", en)]),
        }
    }

    /// Idiomas desconhecidos caem no português.
    pub fn translate(&self, lang: &str, key: &str) -> &'static str {
        self.messages
            .get(lang)
            .or_else(|| self.messages.get(DEFAULT_LANG))
            .and_then(|m| m.get(key))
            .copied()
            .unwrap_or("Ocorreu um erro inesperado.")
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("fr", "invalid_token"),
            "Token de autenticação inválido ou ausente."
        );
        assert_eq!(store.translate("en", "forbidden"), "Your profile is not allowed to perform this action.");
    }
}
