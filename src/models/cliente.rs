// src/models/cliente.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::formatacao::{
        cpf_sem_pontuacao, normalizar_opcional, rg_sem_pontuacao, telefone_sem_pontuacao,
        validar_cpf, validar_telefone,
    },
    db::repository::{CrudEntity, CrudFilter, SqlValue},
    models::auditoria::{Auditoria, AuditoriaDto, Carimbo},
    services::crud::CrudResource,
};

// --- Entidade (tabela `cliente`) ---
#[derive(Debug, Clone, FromRow)]
pub struct Cliente {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub nome: String,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub telefone: String,
    pub email: Option<String>,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

// --- DTO ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClienteDto {
    pub id: Option<Uuid>,

    // Sempre o prestador do token; o valor enviado é ignorado.
    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "O nome do cliente é obrigatório (até 100 caracteres)."))]
    #[schema(example = "João da Silva")]
    pub nome: String,

    #[validate(custom(function = "validar_cpf"))]
    #[schema(example = "123.456.789-00")]
    pub cpf: Option<String>,

    #[validate(length(max = 14, message = "O RG deve ter no máximo 14 caracteres."))]
    #[schema(example = "12.345.678-9")]
    pub rg: Option<String>,

    #[validate(custom(function = "validar_telefone"))]
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joao@email.com")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<Cliente> for ClienteDto {
    fn from(c: Cliente) -> Self {
        Self {
            id: Some(c.id),
            prestador_id: Some(c.prestador_id),
            nome: c.nome,
            cpf: c.cpf,
            rg: c.rg,
            telefone: c.telefone,
            email: c.email,
            auditoria: c.auditoria.into(),
        }
    }
}

// --- Filtro do GET /api/cliente ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClienteFiltro {
    pub cpf: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
}

impl CrudFilter for ClienteFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        // O CPF é gravado sem pontuação, então o filtro também precisa ser.
        let cpf = self.cpf.as_deref().map(cpf_sem_pontuacao);
        vec![
            ("cpf", SqlValue::Text(cpf)),
            ("nome", SqlValue::Text(self.nome.clone())),
            ("email", SqlValue::Text(self.email.clone())),
        ]
    }
}

impl CrudEntity for Cliente {
    const TABLE: &'static str = "cliente";

    fn id(&self) -> Uuid {
        self.id
    }

    fn prestador_id(&self) -> Uuid {
        self.prestador_id
    }

    fn auditoria(&self) -> &Auditoria {
        &self.auditoria
    }

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("nome", SqlValue::Text(Some(self.nome.clone()))),
            ("cpf", SqlValue::Text(self.cpf.clone())),
            ("rg", SqlValue::Text(self.rg.clone())),
            ("telefone", SqlValue::Text(Some(self.telefone.clone()))),
            ("email", SqlValue::Text(self.email.clone())),
        ]
    }
}

impl CrudResource for Cliente {
    type Dto = ClienteDto;
    type Filter = ClienteFiltro;

    const ROUTE: &'static str = "cliente";
    const TAG: &'static str = "Cliente";

    fn normalize(dto: &mut ClienteDto) {
        dto.nome = dto.nome.trim().to_string();
        dto.telefone = telefone_sem_pontuacao(&dto.telefone);
        normalizar_opcional(&mut dto.cpf, cpf_sem_pontuacao);
        normalizar_opcional(&mut dto.rg, rg_sem_pontuacao);
    }

    fn dto_id(dto: &ClienteDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: ClienteDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            nome: dto.nome,
            cpf: dto.cpf,
            rg: dto.rg,
            telefone: dto.telefone,
            email: dto.email,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}
