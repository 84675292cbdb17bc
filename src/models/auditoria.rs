// src/models/auditoria.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Quem está gravando: vem sempre do token, nunca do corpo da requisição.
#[derive(Debug, Clone, PartialEq)]
pub struct Carimbo {
    pub usuario_id: Uuid,
    pub usuario_nome: String,
    pub prestador_id: Uuid,
}

// Colunas de auditoria comuns a todas as tabelas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Auditoria {
    pub data_cadastro: DateTime<Utc>,
    pub usr_cadastro: Uuid,
    pub usr_cadastro_desc: String,
    pub data_desativacao: Option<DateTime<Utc>>,
    pub usr_desativacao: Option<Uuid>,
    pub usr_desativacao_desc: Option<String>,
}

impl Auditoria {
    /// `data_cadastro` aqui é provisória: o INSERT não envia a coluna e o
    /// banco preenche com o DEFAULT NOW(), devolvido pelo RETURNING.
    pub fn nova(carimbo: &Carimbo) -> Self {
        Self {
            data_cadastro: Utc::now(),
            usr_cadastro: carimbo.usuario_id,
            usr_cadastro_desc: carimbo.usuario_nome.clone(),
            data_desativacao: None,
            usr_desativacao: None,
            usr_desativacao_desc: None,
        }
    }

    pub fn ativo(&self) -> bool {
        self.data_desativacao.is_none()
    }
}

// Versão de transporte. Só saída: o que vier no corpo é ignorado.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditoriaDto {
    #[schema(read_only)]
    pub data_cadastro: Option<DateTime<Utc>>,
    #[schema(read_only)]
    pub usr_cadastro: Option<Uuid>,
    #[schema(read_only, example = "Maria Souza")]
    pub usr_cadastro_desc: Option<String>,
    #[schema(read_only)]
    pub data_desativacao: Option<DateTime<Utc>>,
    #[schema(read_only)]
    pub usr_desativacao: Option<Uuid>,
    #[schema(read_only)]
    pub usr_desativacao_desc: Option<String>,
}

impl From<Auditoria> for AuditoriaDto {
    fn from(a: Auditoria) -> Self {
        Self {
            data_cadastro: Some(a.data_cadastro),
            usr_cadastro: Some(a.usr_cadastro),
            usr_cadastro_desc: Some(a.usr_cadastro_desc),
            data_desativacao: a.data_desativacao,
            usr_desativacao: a.usr_desativacao,
            usr_desativacao_desc: a.usr_desativacao_desc,
        }
    }
}
