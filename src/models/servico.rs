// src/models/servico.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::formatacao::validar_nao_negativo,
    db::repository::{CrudEntity, CrudFilter, SqlValue},
    models::auditoria::{Auditoria, AuditoriaDto, Carimbo},
    services::crud::CrudResource,
};

// Item de uma ordem de serviço.
#[derive(Debug, Clone, FromRow)]
pub struct Servico {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub nome: String,
    pub valor: Decimal,
    pub prestacao_servico_id: Uuid,
    pub categoria_servico_id: Option<Uuid>,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicoDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(min = 1, max = 250, message = "O nome do serviço é obrigatório (até 250 caracteres)."))]
    #[schema(example = "Troca de pastilhas")]
    pub nome: String,

    #[validate(custom(function = "validar_nao_negativo"))]
    #[schema(example = "150.00")]
    pub valor: Decimal,

    pub prestacao_servico_id: Uuid,

    pub categoria_servico_id: Option<Uuid>,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<Servico> for ServicoDto {
    fn from(s: Servico) -> Self {
        Self {
            id: Some(s.id),
            prestador_id: Some(s.prestador_id),
            nome: s.nome,
            valor: s.valor,
            prestacao_servico_id: s.prestacao_servico_id,
            categoria_servico_id: s.categoria_servico_id,
            auditoria: s.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServicoFiltro {
    pub prestacao_servico_id: Option<Uuid>,
    pub nome: Option<String>,
    pub categoria_servico_id: Option<Uuid>,
}

impl CrudFilter for ServicoFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("prestacao_servico_id", SqlValue::Id(self.prestacao_servico_id)),
            ("nome", SqlValue::Text(self.nome.clone())),
            ("categoria_servico_id", SqlValue::Id(self.categoria_servico_id)),
        ]
    }
}

impl CrudEntity for Servico {
    const TABLE: &'static str = "servico";

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
            ("valor", SqlValue::Decimal(Some(self.valor))),
            ("prestacao_servico_id", SqlValue::Id(Some(self.prestacao_servico_id))),
            ("categoria_servico_id", SqlValue::Id(self.categoria_servico_id)),
        ]
    }
}

impl CrudResource for Servico {
    type Dto = ServicoDto;
    type Filter = ServicoFiltro;

    const ROUTE: &'static str = "servico";
    const TAG: &'static str = "Servico";

    fn normalize(dto: &mut ServicoDto) {
        dto.nome = dto.nome.trim().to_string();
    }

    fn dto_id(dto: &ServicoDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: ServicoDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            nome: dto.nome,
            valor: dto.valor,
            prestacao_servico_id: dto.prestacao_servico_id,
            categoria_servico_id: dto.categoria_servico_id,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_is_optional() {
        let ordem = Uuid::new_v4();
        let mut dto: ServicoDto = serde_json::from_value(json!({
            "nome": " Alinhamento ",
            "valor": 80,
            "prestacaoServicoId": ordem
        }))
        .unwrap();
        Servico::normalize(&mut dto);

        assert!(dto.validate().is_ok());
        assert_eq!(dto.nome, "Alinhamento");

        let carimbo = Carimbo {
            usuario_id: Uuid::new_v4(),
            usuario_nome: "Ana".into(),
            prestador_id: Uuid::new_v4(),
        };
        let servico = Servico::from_dto(dto, Uuid::now_v7(), &carimbo);
        assert_eq!(servico.prestacao_servico_id, ordem);
        assert_eq!(servico.categoria_servico_id, None);
    }

    #[test]
    fn name_over_250_chars_is_rejected() {
        let dto: ServicoDto = serde_json::from_value(json!({
            "nome": "x".repeat(251),
            "valor": 10,
            "prestacaoServicoId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("nome"));
    }
}
