// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{PrestadorRepository, UserRepository},
    services::auth::AuthService,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_expiration_hours = match lookup("JWT_EXPIRATION_HOURS") {
            Some(v) => v.parse().context("JWT_EXPIRATION_HOURS deve ser um número")?,
            None => 8,
        };
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS deve ser um número")?,
            None => 5,
        };
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration_hours,
            server_addr,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub prestador_repo: PrestadorRepository,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let prestador_repo = PrestadorRepository::new(db_pool.clone());
        let auth_service = AuthService::new(
            user_repo,
            prestador_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            db_pool.clone(),
        );

        Self {
            db_pool,
            auth_service,
            prestador_repo,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn optional_settings_have_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/oficina"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_expiration_hours, 8);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.server_addr, "0.0.0.0:3000");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/oficina")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/oficina"),
            ("JWT_SECRET", "segredo"),
            ("JWT_EXPIRATION_HOURS", "oito"),
        ]));
        assert!(result.is_err());
    }
}
