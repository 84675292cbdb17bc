// src/models/produto.rs

use chrono::NaiveDate;
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

#[derive(Debug, Clone, FromRow)]
pub struct Produto {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub nome: String,
    pub marca: String,
    pub modelo: String,
    // Sempre preenchida no banco; `None` só numa entidade montada do DTO.
    pub data_validade: Option<NaiveDate>,
    pub garantia: String,
    pub valor_compra: Decimal,
    pub valor_venda: Decimal,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoDto {
    pub id: Option<Uuid>,

    #[schema(read_only)]
    pub prestador_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "O nome do produto é obrigatório (até 100 caracteres)."))]
    #[schema(example = "Pastilha de freio")]
    pub nome: String,

    #[validate(length(min = 1, max = 25, message = "A marca é obrigatória (até 25 caracteres)."))]
    #[schema(example = "Bosch")]
    pub marca: String,

    #[validate(length(min = 1, max = 50, message = "O modelo é obrigatório (até 50 caracteres)."))]
    #[schema(example = "BB-1234")]
    pub modelo: String,

    /// Omitida no cadastro vale a data de hoje; na alteração, fica a gravada.
    #[schema(example = "2026-12-31")]
    pub data_validade: Option<NaiveDate>,

    #[validate(length(min = 1, max = 10, message = "A garantia é obrigatória (até 10 caracteres)."))]
    #[schema(example = "90 dias")]
    pub garantia: String,

    #[validate(custom(function = "validar_nao_negativo"))]
    #[schema(example = "45.90")]
    pub valor_compra: Decimal,

    #[validate(custom(function = "validar_nao_negativo"))]
    #[schema(example = "89.90")]
    pub valor_venda: Decimal,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<Produto> for ProdutoDto {
    fn from(p: Produto) -> Self {
        Self {
            id: Some(p.id),
            prestador_id: Some(p.prestador_id),
            nome: p.nome,
            marca: p.marca,
            modelo: p.modelo,
            data_validade: p.data_validade,
            garantia: p.garantia,
            valor_compra: p.valor_compra,
            valor_venda: p.valor_venda,
            auditoria: p.auditoria.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProdutoFiltro {
    pub marca: Option<String>,
    pub nome: Option<String>,
    pub modelo: Option<String>,
}

impl CrudFilter for ProdutoFiltro {
    fn conditions(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("marca", SqlValue::Text(self.marca.clone())),
            ("nome", SqlValue::Text(self.nome.clone())),
            ("modelo", SqlValue::Text(self.modelo.clone())),
        ]
    }
}

impl CrudEntity for Produto {
    const TABLE: &'static str = "produto";

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
        let mut columns = vec![
            ("nome", SqlValue::Text(Some(self.nome.clone()))),
            ("marca", SqlValue::Text(Some(self.marca.clone()))),
            ("modelo", SqlValue::Text(Some(self.modelo.clone()))),
            ("garantia", SqlValue::Text(Some(self.garantia.clone()))),
            ("valor_compra", SqlValue::Decimal(Some(self.valor_compra))),
            ("valor_venda", SqlValue::Decimal(Some(self.valor_venda))),
        ];
        // Fora do INSERT o banco aplica o DEFAULT CURRENT_DATE; fora do UPDATE a data fica.
        if let Some(data) = self.data_validade {
            columns.push(("data_validade", SqlValue::Date(Some(data))));
        }
        columns
    }
}

impl CrudResource for Produto {
    type Dto = ProdutoDto;
    type Filter = ProdutoFiltro;

    const ROUTE: &'static str = "produto";
    const TAG: &'static str = "Produto";

    fn normalize(dto: &mut ProdutoDto) {
        dto.nome = dto.nome.trim().to_string();
        dto.marca = dto.marca.trim().to_string();
        dto.modelo = dto.modelo.trim().to_string();
        dto.garantia = dto.garantia.trim().to_string();
    }

    fn dto_id(dto: &ProdutoDto) -> Option<Uuid> {
        dto.id
    }

    fn from_dto(dto: ProdutoDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            prestador_id: carimbo.prestador_id,
            nome: dto.nome,
            marca: dto.marca,
            modelo: dto.modelo,
            data_validade: dto.data_validade,
            garantia: dto.garantia,
            valor_compra: dto.valor_compra,
            valor_venda: dto.valor_venda,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn carimbo() -> Carimbo {
        Carimbo {
            usuario_id: Uuid::new_v4(),
            usuario_nome: "Ana".into(),
            prestador_id: Uuid::new_v4(),
        }
    }

    fn payload() -> ProdutoDto {
        serde_json::from_value(json!({
            "nome": "Pastilha de freio",
            "marca": "Bosch",
            "modelo": "BB-1234",
            "garantia": "90 dias",
            "valorCompra": 45.9,
            "valorVenda": 89.9
        }))
        .unwrap()
    }

    fn has_column(produto: &Produto, name: &str) -> bool {
        produto.columns().iter().any(|(c, _)| *c == name)
    }

    #[test]
    fn omitted_expiry_is_left_out_of_the_write() {
        let produto = Produto::from_dto(payload(), Uuid::now_v7(), &carimbo());
        assert_eq!(produto.data_validade, None);
        assert!(!has_column(&produto, "data_validade"));

        let mut dto = payload();
        dto.data_validade = NaiveDate::from_ymd_opt(2030, 1, 31);
        let produto = Produto::from_dto(dto, Uuid::now_v7(), &carimbo());
        assert!(produto
            .columns()
            .contains(&("data_validade", SqlValue::Date(NaiveDate::from_ymd_opt(2030, 1, 31)))));
    }

    #[test]
    fn negative_price_and_long_warranty_are_rejected() {
        let mut dto = payload();
        dto.valor_venda = Decimal::new(-100, 2);
        dto.garantia = "mais de dez caracteres".into();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("valor_venda"));
        assert!(fields.contains_key("garantia"));
        assert!(!fields.contains_key("valor_compra"));
    }

    #[test]
    fn prices_round_trip_through_dto() {
        let produto = Produto::from_dto(payload(), Uuid::now_v7(), &carimbo());
        let dto = ProdutoDto::from(produto);
        assert_eq!(dto.valor_compra, Decimal::new(459, 1));
    }
}
