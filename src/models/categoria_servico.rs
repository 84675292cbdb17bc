// src/models/categoria_servico.rs

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

#[derive(Debug, Clone, FromRow)]
pub struct CategoriaServico {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub titulo: String,
    pub descricao: String,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaServicoDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "O título da categoria é obrigatório."))]
    #[schema(example = "Funilaria")]
    pub titulo: String,

    #[serde(alias = "desc")]
    #[validate(length(min = 1, max = 250, message = "A descrição da categoria é obrigatória."))]
    #[schema(example = "Reparos de lataria e pintura")]
    pub descricao: String,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<CategoriaServico> for CategoriaServicoDto {
    fn from(c: CategoriaServico) -> Self {
        Self {
            id: Some(c.id),
            prestador_id: Some(c.prestador_id),
            titulo: c.titulo,
            descricao: c.descricao,
            auditoria: c.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoriaServicoFiltro {
    pub titulo: Option<String>,
}

impl CrudFilter for CategoriaServicoFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![("titulo", SqlValue::Text(self.titulo.clone()))]
    }
}

impl CrudEntity for CategoriaServico {
    const TABLE: &'static str = "categoria_servico";

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
            ("titulo", SqlValue::Text(Some(self.titulo.clone()))),
            ("descricao", SqlValue::Text(Some(self.descricao.clone()))),
        ]
    }
}

impl CrudResource for CategoriaServico {
    type Dto = CategoriaServicoDto;
    type Filter = CategoriaServicoFiltro;

    const ROUTE: &'static str = "categoriaservico";
    const TAG: &'static str = "CategoriaServico";

    fn normalize(dto: &mut CategoriaServicoDto) {
        dto.titulo = dto.titulo.trim().to_string();
        dto.descricao = dto.descricao.trim().to_string();
    }

    fn dto_id(dto: &CategoriaServicoDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: CategoriaServicoDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            titulo: dto.titulo,
            descricao: dto.descricao,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_title_and_description_carry_fixed_messages() {
        let mut dto: CategoriaServicoDto =
            serde_json::from_value(json!({ "titulo": "  ", "desc": "" })).unwrap();
        CategoriaServico::normalize(&mut dto);

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        let titulo = &fields["titulo"][0];
        assert_eq!(titulo.message.as_deref(), Some("O título da categoria é obrigatório."));
        let descricao = &fields["descricao"][0];
        assert_eq!(descricao.message.as_deref(), Some("A descrição da categoria é obrigatória."));
    }

    #[test]
    fn accepts_a_complete_category() {
        let mut dto: CategoriaServicoDto = serde_json::from_value(json!({
            "titulo": "Funilaria",
            "descricao": "Reparos de lataria"
        }))
        .unwrap();
        CategoriaServico::normalize(&mut dto);
        assert!(dto.validate().is_ok());
    }
}
