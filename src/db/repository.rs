// src/db/repository.rs

use std::marker::PhantomData;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auditoria::{Auditoria, Carimbo},
};

// Valor de uma coluna, já no tipo que o Postgres espera.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Decimal(Option<Decimal>),
    Date(Option<NaiveDate>),
    Id(Option<Uuid>),
}

impl SqlValue {
    /// Valores vazios não entram no filtro do `get_all`.
    pub fn is_empty(&self) -> bool {
        match self {
            SqlValue::Text(v) => v.as_deref().is_none_or(|s| s.trim().is_empty()),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::Decimal(v) => v.is_none(),
            SqlValue::Date(v) => v.is_none(),
            SqlValue::Id(v) => v.is_none(),
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::Int(v) => qb.push_bind(v),
        SqlValue::Decimal(v) => qb.push_bind(v),
        SqlValue::Date(v) => qb.push_bind(v),
        SqlValue::Id(v) => qb.push_bind(v),
    };
}

/// Uma tabela com chave `id`, coluna de tenant `prestador_id` e as colunas
/// de auditoria. O resto das colunas vem de `columns`, que é a única coisa
/// que cada entidade precisa descrever para ganhar o CRUD completo.
pub trait CrudEntity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;

    fn id(&self) -> Uuid;
    fn prestador_id(&self) -> Uuid;
    fn auditoria(&self) -> &Auditoria;

    /// Colunas de negócio, sem id, tenant e auditoria.
    fn columns(&self) -> Vec<(&'static str, SqlValue)>;
}

/// Filtro do `get_all`: cada condição não vazia vira um `AND coluna = valor`.
pub trait CrudFilter {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)>;
}

pub(crate) fn insert_query<T: CrudEntity>(item: &T) -> QueryBuilder<'static, Postgres> {
    let auditoria = item.auditoria();
    let mut columns = vec![
        ("id", SqlValue::Id(Some(item.id()))),
        ("prestador_id", SqlValue::Id(Some(item.prestador_id()))),
        ("usr_cadastro", SqlValue::Id(Some(auditoria.usr_cadastro))),
        ("usr_cadastro_desc", SqlValue::Text(Some(auditoria.usr_cadastro_desc.clone()))),
    ];
    columns.extend(item.columns());

    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();

    let mut qb = QueryBuilder::new(format!("INSERT INTO {} (", T::TABLE));
    qb.push(names.join(", "));
    qb.push(") VALUES (");
    for (i, (_, value)) in columns.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(&mut qb, value);
    }
    qb.push(") RETURNING *");
    qb
}

// O UPDATE recarimba o autor; data_cadastro e desativação ficam como estão.
pub(crate) fn update_query<T: CrudEntity>(item: &T) -> QueryBuilder<'static, Postgres> {
    let auditoria = item.auditoria();
    let mut columns = vec![
        ("usr_cadastro", SqlValue::Id(Some(auditoria.usr_cadastro))),
        ("usr_cadastro_desc", SqlValue::Text(Some(auditoria.usr_cadastro_desc.clone()))),
    ];
    columns.extend(item.columns());

    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
    for (i, (name, value)) in columns.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(name).push(" = ");
        push_value(&mut qb, value);
    }
    qb.push(" WHERE id = ").push_bind(item.id());
    qb.push(" AND prestador_id = ").push_bind(item.prestador_id());
    qb.push(" RETURNING *");
    qb
}

pub(crate) fn select_query<T: CrudEntity, F: CrudFilter>(
    prestador_id: Uuid,
    filter: &F,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT * FROM {} WHERE prestador_id = ", T::TABLE));
    qb.push_bind(prestador_id);
    for (name, value) in filter.conditions() {
        if value.is_empty() {
            continue;
        }
        qb.push(" AND ").push(name).push(" = ");
        push_value(&mut qb, value);
    }
    qb.push(" ORDER BY data_cadastro ASC");
    qb
}

// Desativar de novo devolve o registro mas mantém a primeira data e autor.
pub(crate) fn disable_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET \
         data_desativacao = COALESCE(data_desativacao, NOW()), \
         usr_desativacao = COALESCE(usr_desativacao, $1), \
         usr_desativacao_desc = COALESCE(usr_desativacao_desc, $2) \
         WHERE id = $3 AND prestador_id = $4 RETURNING *"
    )
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::InvalidReference;
        }
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("desconhecida").to_string();
            return AppError::UniqueConstraintViolation(constraint);
        }
    }
    e.into()
}

// O repositório genérico: o mesmo código atende todas as tabelas de cadastro.
pub struct Repository<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: CrudEntity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, item: &T) -> Result<T, AppError> {
        let mut qb = insert_query(item);
        let created = qb
            .build_query_as::<T>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        tracing::debug!(tabela = T::TABLE, id = %item.id(), "registro criado");
        Ok(created)
    }

    /// `None` quando o id não existe para este prestador.
    pub async fn update(&self, item: &T) -> Result<Option<T>, AppError> {
        let mut qb = update_query(item);
        let updated = qb
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(updated)
    }

    pub async fn find_by_id(&self, prestador_id: Uuid, id: Uuid) -> Result<Option<T>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1 AND prestador_id = $2", T::TABLE);
        let found = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(prestador_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    pub async fn get_all<F: CrudFilter>(
        &self,
        prestador_id: Uuid,
        filter: &F,
    ) -> Result<Vec<T>, AppError> {
        let mut qb = select_query::<T, F>(prestador_id, filter);
        let items = qb.build_query_as::<T>().fetch_all(&self.pool).await?;

        Ok(items)
    }

    /// Desativação lógica: o registro continua consultável.
    pub async fn disable(&self, id: Uuid, carimbo: &Carimbo) -> Result<Option<T>, AppError> {
        let sql = disable_sql(T::TABLE);
        let disabled = sqlx::query_as::<_, T>(&sql)
            .bind(carimbo.usuario_id)
            .bind(&carimbo.usuario_nome)
            .bind(id)
            .bind(carimbo.prestador_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(disabled)
    }

    /// Exclusão física. `false` quando nada foi apagado.
    pub async fn delete(&self, prestador_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND prestador_id = $2", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(prestador_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        tracing::info!(tabela = T::TABLE, %id, "exclusão bloqueada: {}", db_err.message());
                        return AppError::RecordInUse;
                    }
                }
                e.into()
            })?;

        Ok(result.rows_affected() > 0)
    }
}
