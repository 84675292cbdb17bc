// src/db/user_repo.rs

use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auditoria::Carimbo,
        auth::{Perfil, Usuario},
    },
};

// Dados de um novo login; o hash já vem calculado pelo serviço.
pub struct NovoUsuario<'a> {
    pub id: Uuid,
    pub funcionario_id: Option<Uuid>,
    pub nome: &'a str,
    pub email: &'a str,
    pub senha_hash: &'a str,
    pub perfil: Perfil,
}

// Usuário do login junto com a situação do prestador e do funcionário
// a que ele está ligado.
#[derive(Debug, FromRow)]
pub struct UsuarioLogin {
    #[sqlx(flatten)]
    pub usuario: Usuario,
    pub vinculo_ativo: bool,
}

// Acesso à tabela `usuario`
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuario WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    /// Desativar o prestador ou o funcionário derruba o login também.
    pub async fn find_for_login(&self, email: &str) -> Result<Option<UsuarioLogin>, AppError> {
        let login = sqlx::query_as::<_, UsuarioLogin>(
            r#"
            SELECT u.*,
                   (p.data_desativacao IS NULL AND f.data_desativacao IS NULL) AS vinculo_ativo
            FROM usuario u
            JOIN prestador p ON p.id = u.prestador_id
            LEFT JOIN funcionario_prestador f ON f.id = u.funcionario_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(login)
    }

    /// Aceita o pool ou uma transação: o registro do prestador cria o
    /// prestador e o login do dono na mesma transação.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        novo: NovoUsuario<'_>,
        carimbo: &Carimbo,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuario (
                id, prestador_id, funcionario_id, nome, email, senha_hash, perfil,
                usr_cadastro, usr_cadastro_desc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(novo.id)
        .bind(carimbo.prestador_id)
        .bind(novo.funcionario_id)
        .bind(novo.nome)
        .bind(novo.email)
        .bind(novo.senha_hash)
        .bind(novo.perfil)
        .bind(carimbo.usuario_id)
        .bind(&carimbo.usuario_nome)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("usuario_email_key") => AppError::EmailAlreadyExists,
                        Some(constraint) => AppError::UniqueConstraintViolation(constraint.to_string()),
                        None => AppError::EmailAlreadyExists,
                    };
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::InvalidReference;
                }
            }
            e.into()
        })?;

        Ok(usuario)
    }
}
