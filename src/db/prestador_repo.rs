// src/db/prestador_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auditoria::Carimbo, prestador::Prestador},
};

// O prestador não passa pelo repositório genérico: ele é o tenant, então
// as consultas filtram pelo próprio id.
#[derive(Clone)]
pub struct PrestadorRepository {
    pool: PgPool,
}

impl PrestadorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, p: &Prestador) -> Result<Prestador, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Prestador>(
            r#"
            INSERT INTO prestador (
                id, tipo_cadastro, nome, cpf, cpf_representante, cnpj, razao_social,
                nome_fantasia, nome_representante, telefone, email_empresa, endereco,
                email_representante, situacao_cadastral, data_abertura, data_situacao_cadastral,
                usr_cadastro, usr_cadastro_desc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.tipo_cadastro)
        .bind(&p.nome)
        .bind(&p.cpf)
        .bind(&p.cpf_representante)
        .bind(&p.cnpj)
        .bind(&p.razao_social)
        .bind(&p.nome_fantasia)
        .bind(&p.nome_representante)
        .bind(&p.telefone)
        .bind(&p.email_empresa)
        .bind(&p.endereco)
        .bind(&p.email_representante)
        .bind(p.situacao_cadastral)
        .bind(p.data_abertura)
        .bind(p.data_situacao_cadastral)
        .bind(p.auditoria.usr_cadastro)
        .bind(&p.auditoria.usr_cadastro_desc)
        .fetch_one(executor)
        .await
        .map_err(map_unique)?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Prestador>, AppError> {
        let found = sqlx::query_as::<_, Prestador>("SELECT * FROM prestador WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found)
    }

    pub async fn update(&self, p: &Prestador) -> Result<Option<Prestador>, AppError> {
        let updated = sqlx::query_as::<_, Prestador>(
            r#"
            UPDATE prestador SET
                tipo_cadastro = $2, nome = $3, cpf = $4, cpf_representante = $5, cnpj = $6,
                razao_social = $7, nome_fantasia = $8, nome_representante = $9, telefone = $10,
                email_empresa = $11, endereco = $12, email_representante = $13,
                situacao_cadastral = $14, data_abertura = $15, data_situacao_cadastral = $16,
                usr_cadastro = $17, usr_cadastro_desc = $18
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.tipo_cadastro)
        .bind(&p.nome)
        .bind(&p.cpf)
        .bind(&p.cpf_representante)
        .bind(&p.cnpj)
        .bind(&p.razao_social)
        .bind(&p.nome_fantasia)
        .bind(&p.nome_representante)
        .bind(&p.telefone)
        .bind(&p.email_empresa)
        .bind(&p.endereco)
        .bind(&p.email_representante)
        .bind(p.situacao_cadastral)
        .bind(p.data_abertura)
        .bind(p.data_situacao_cadastral)
        .bind(p.auditoria.usr_cadastro)
        .bind(&p.auditoria.usr_cadastro_desc)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique)?;

        Ok(updated)
    }

    pub async fn disable(&self, carimbo: &Carimbo) -> Result<Option<Prestador>, AppError> {
        let disabled = sqlx::query_as::<_, Prestador>(
            r#"
            UPDATE prestador
            SET data_desativacao = COALESCE(data_desativacao, NOW()),
                usr_desativacao = COALESCE(usr_desativacao, $1),
                usr_desativacao_desc = COALESCE(usr_desativacao_desc, $2)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(carimbo.usuario_id)
        .bind(&carimbo.usuario_nome)
        .bind(carimbo.prestador_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(disabled)
    }
}

fn map_unique(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("prestador").to_string();
            return AppError::UniqueConstraintViolation(constraint);
        }
    }
    e.into()
}
