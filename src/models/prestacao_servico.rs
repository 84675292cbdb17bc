// src/models/prestacao_servico.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::repository::{CrudEntity, CrudFilter, SqlValue},
    models::auditoria::{Auditoria, AuditoriaDto, Carimbo},
    services::crud::CrudResource,
};

// Fluxo da ordem de serviço.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrestacaoServicoStatus {
    #[default]
    Orcamento = 0,
    Aprovado = 1,
    EmAndamento = 2,
    Concluido = 3,
    Cancelado = 4,
}

#[derive(Debug, Clone, FromRow)]
pub struct PrestacaoServico {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub referencia: Option<String>,
    pub status: PrestacaoServicoStatus,
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrestacaoServicoDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(max = 50, message = "A referência deve ter no máximo 50 caracteres."))]
    #[schema(example = "OS-2024-0001")]
    pub referencia: Option<String>,

    #[serde(default)]
    pub status: PrestacaoServicoStatus,

    // Cliente e veículo precisam ser do mesmo prestador (FK composta).
    pub cliente_id: Uuid,
    pub veiculo_id: Uuid,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<PrestacaoServico> for PrestacaoServicoDto {
    fn from(p: PrestacaoServico) -> Self {
        Self {
            id: Some(p.id),
            prestador_id: Some(p.prestador_id),
            referencia: p.referencia,
            status: p.status,
            cliente_id: p.cliente_id,
            veiculo_id: p.veiculo_id,
            auditoria: p.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PrestacaoServicoFiltro {
    pub referencia: Option<String>,
    pub status: Option<PrestacaoServicoStatus>,
    pub cliente_id: Option<Uuid>,
    pub veiculo_id: Option<Uuid>,
}

impl CrudFilter for PrestacaoServicoFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("referencia", SqlValue::Text(self.referencia.clone())),
            ("status", SqlValue::Int(self.status.map(|s| s as i32))),
            ("cliente_id", SqlValue::Id(self.cliente_id)),
            ("veiculo_id", SqlValue::Id(self.veiculo_id)),
        ]
    }
}

impl CrudEntity for PrestacaoServico {
    const TABLE: &'static str = "prestacao_servico";

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
            ("referencia", SqlValue::Text(self.referencia.clone())),
            ("status", SqlValue::Int(Some(self.status as i32))),
            ("cliente_id", SqlValue::Id(Some(self.cliente_id))),
            ("veiculo_id", SqlValue::Id(Some(self.veiculo_id))),
        ]
    }
}

impl CrudResource for PrestacaoServico {
    type Dto = PrestacaoServicoDto;
    type Filter = PrestacaoServicoFiltro;

    const ROUTE: &'static str = "prestacaoservico";
    const TAG: &'static str = "PrestacaoServico";

    fn normalize(dto: &mut PrestacaoServicoDto) {
        dto.referencia = dto
            .referencia
            .as_deref()
            .map(|r| r.trim().to_uppercase())
            .filter(|r| !r.is_empty());
    }

    fn dto_id(dto: &PrestacaoServicoDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: PrestacaoServicoDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            referencia: dto.referencia,
            status: dto.status,
            cliente_id: dto.cliente_id,
            veiculo_id: dto.veiculo_id,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_defaults_to_budget() {
        let dto: PrestacaoServicoDto = serde_json::from_value(json!({
            "referencia": "os-1",
            "clienteId": Uuid::new_v4(),
            "veiculoId": Uuid::new_v4()
        }))
        .unwrap();
        assert_eq!(dto.status, PrestacaoServicoStatus::Orcamento);
    }

    #[test]
    fn filter_binds_status_as_integer_and_skips_missing_links() {
        let filtro: PrestacaoServicoFiltro =
            serde_json::from_value(json!({ "status": "EM_ANDAMENTO" })).unwrap();
        let conditions = filtro.conditions();

        assert_eq!(conditions[1], ("status", SqlValue::Int(Some(2))));
        assert!(conditions[2].1.is_empty());
        assert!(conditions[3].1.is_empty());
    }

    #[test]
    fn reference_is_upper_cased() {
        let mut dto: PrestacaoServicoDto = serde_json::from_value(json!({
            "referencia": " os-1 ",
            "status": "APROVADO",
            "clienteId": Uuid::new_v4(),
            "veiculoId": Uuid::new_v4()
        }))
        .unwrap();
        PrestacaoServico::normalize(&mut dto);
        assert_eq!(dto.referencia.as_deref(), Some("OS-1"));
    }
}
