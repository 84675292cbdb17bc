// src/models/funcionario.rs

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

// --- Entidade (tabela `funcionario_prestador`) ---
#[derive(Debug, Clone, FromRow)]
pub struct FuncionarioPrestador {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub rg: String,
    pub cpf: String,
    pub endereco: String,
    pub cargo: String,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FuncionarioPrestadorDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "O nome do funcionário é obrigatório (até 100 caracteres)."))]
    #[schema(example = "Carlos Pereira")]
    pub nome: String,

    #[validate(custom(function = "validar_telefone"))]
    #[schema(example = "(11) 3333-4444")]
    pub telefone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "carlos@oficina.com")]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 14, message = "O RG é obrigatório (até 14 caracteres)."))]
    #[schema(example = "12.345.678-9")]
    pub rg: String,

    #[validate(custom(function = "validar_cpf"))]
    #[schema(example = "987.654.321-00")]
    pub cpf: String,

    #[validate(length(min = 1, max = 250, message = "O endereço é obrigatório (até 250 caracteres)."))]
    #[schema(example = "Rua das Oficinas, 100")]
    pub endereco: String,

    #[validate(length(min = 1, max = 50, message = "O cargo é obrigatório (até 50 caracteres)."))]
    #[schema(example = "Mecânico")]
    pub cargo: String,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<FuncionarioPrestador> for FuncionarioPrestadorDto {
    fn from(f: FuncionarioPrestador) -> Self {
        Self {
            id: Some(f.id),
            prestador_id: Some(f.prestador_id),
            nome: f.nome,
            telefone: f.telefone,
            email: f.email,
            rg: f.rg,
            cpf: f.cpf,
            endereco: f.endereco,
            cargo: f.cargo,
            auditoria: f.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FuncionarioFiltro {
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub cargo: Option<String>,
}

impl CrudFilter for FuncionarioFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("nome", SqlValue::Text(self.nome.clone())),
            ("cpf", SqlValue::Text(self.cpf.as_deref().map(cpf_sem_pontuacao))),
            ("cargo", SqlValue::Text(self.cargo.clone())),
        ]
    }
}

impl CrudEntity for FuncionarioPrestador {
    const TABLE: &'static str = "funcionario_prestador";

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
            ("telefone", SqlValue::Text(self.telefone.clone())),
            ("email", SqlValue::Text(self.email.clone())),
            ("rg", SqlValue::Text(Some(self.rg.clone()))),
            ("cpf", SqlValue::Text(Some(self.cpf.clone()))),
            ("endereco", SqlValue::Text(Some(self.endereco.clone()))),
            ("cargo", SqlValue::Text(Some(self.cargo.clone()))),
        ]
    }
}

impl CrudResource for FuncionarioPrestador {
    type Dto = FuncionarioPrestadorDto;
    type Filter = FuncionarioFiltro;

    const ROUTE: &'static str = "funcionario";
    const TAG: &'static str = "Funcionario";
    // Funcionário não cadastra nem altera colegas.
    const OWNER_ONLY_WRITE: bool = true;

    fn normalize(dto: &mut FuncionarioPrestadorDto) {
        dto.nome = dto.nome.trim().to_string();
        dto.cpf = cpf_sem_pontuacao(&dto.cpf);
        dto.rg = rg_sem_pontuacao(&dto.rg);
        dto.endereco = dto.endereco.trim().to_string();
        dto.cargo = dto.cargo.trim().to_string();
        normalizar_opcional(&mut dto.telefone, telefone_sem_pontuacao);
    }

    fn dto_id(dto: &FuncionarioPrestadorDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: FuncionarioPrestadorDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            nome: dto.nome,
            telefone: dto.telefone,
            email: dto.email,
            rg: dto.rg,
            cpf: dto.cpf,
            endereco: dto.endereco,
            cargo: dto.cargo,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}
