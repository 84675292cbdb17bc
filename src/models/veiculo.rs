// src/models/veiculo.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::formatacao::placa_normalizada,
    db::repository::{CrudEntity, CrudFilter, SqlValue},
    models::auditoria::{Auditoria, AuditoriaDto, Carimbo},
    services::crud::CrudResource,
};

// --- Enum (gravado como INTEGER) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VeiculoTipo {
    Carro = 0,
    Moto = 1,
    Caminhao = 2,
    Outro = 3,
}

// --- Entidade (tabela `veiculo`) ---
#[derive(Debug, Clone, FromRow)]
pub struct Veiculo {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub chassi: Option<String>,
    pub tipo: VeiculoTipo,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

// --- DTO ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VeiculoDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(equal = 7, message = "A placa deve conter 7 caracteres."))]
    #[schema(example = "ABC-1D23")]
    pub placa: String,

    #[validate(length(min = 1, max = 25, message = "A marca é obrigatória (até 25 caracteres)."))]
    #[schema(example = "Fiat")]
    pub marca: String,

    #[validate(length(min = 1, max = 50, message = "O modelo é obrigatório (até 50 caracteres)."))]
    #[schema(example = "Uno")]
    pub modelo: String,

    #[validate(length(max = 17, message = "O chassi deve ter no máximo 17 caracteres."))]
    #[schema(example = "9BWZZZ377VT004251")]
    pub chassi: Option<String>,

    pub tipo: VeiculoTipo,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<Veiculo> for VeiculoDto {
    fn from(v: Veiculo) -> Self {
        Self {
            id: Some(v.id),
            prestador_id: Some(v.prestador_id),
            placa: v.placa,
            marca: v.marca,
            modelo: v.modelo,
            chassi: v.chassi,
            tipo: v.tipo,
            auditoria: v.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VeiculoFiltro {
    pub placa: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

impl CrudFilter for VeiculoFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("placa", SqlValue::Text(self.placa.as_deref().map(placa_normalizada))),
            ("marca", SqlValue::Text(self.marca.clone())),
            ("modelo", SqlValue::Text(self.modelo.clone())),
        ]
    }
}

impl CrudEntity for Veiculo {
    const TABLE: &'static str = "veiculo";

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
            ("placa", SqlValue::Text(Some(self.placa.clone()))),
            ("marca", SqlValue::Text(Some(self.marca.clone()))),
            ("modelo", SqlValue::Text(Some(self.modelo.clone()))),
            ("chassi", SqlValue::Text(self.chassi.clone())),
            ("tipo", SqlValue::Int(Some(self.tipo as i32))),
        ]
    }
}

impl CrudResource for Veiculo {
    type Dto = VeiculoDto;
    type Filter = VeiculoFiltro;

    const ROUTE: &'static str = "veiculo";
    const TAG: &'static str = "Veiculo";

    fn normalize(dto: &mut VeiculoDto) {
        dto.placa = placa_normalizada(&dto.placa);
        dto.marca = dto.marca.trim().to_string();
        dto.modelo = dto.modelo.trim().to_string();
        dto.chassi = dto
            .chassi
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
    }

    fn dto_id(dto: &VeiculoDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: VeiculoDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            placa: dto.placa,
            marca: dto.marca,
            modelo: dto.modelo,
            chassi: dto.chassi,
            tipo: dto.tipo,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}
