// src/models/prestador.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::formatacao::{
        cnpj_sem_pontuacao, cpf_sem_pontuacao, normalizar_opcional, telefone_sem_pontuacao,
        validar_cnpj, validar_cpf, validar_telefone,
    },
    models::auditoria::{Auditoria, AuditoriaDto, Carimbo},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoCadastro {
    #[default]
    PessoaFisica = 0,
    PessoaJuridica = 1,
}

// O prestador é o próprio tenant: não tem `prestador_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Prestador {
    pub id: Uuid,
    pub tipo_cadastro: TipoCadastro,
    pub nome: String,
    pub cpf: Option<String>,
    pub cpf_representante: Option<String>,
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub nome_representante: Option<String>,
    pub telefone: String,
    pub email_empresa: String,
    pub endereco: String,
    pub email_representante: Option<String>,
    pub situacao_cadastral: i32,
    pub data_abertura: Option<NaiveDate>,
    pub data_situacao_cadastral: Option<NaiveDate>,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validar_documento_prestador"))]
pub struct PrestadorDto {
    #[schema(read_only)]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub tipo_cadastro: TipoCadastro,

    #[validate(length(min = 1, max = 150, message = "O nome do prestador é obrigatório (até 150 caracteres)."))]
    #[schema(example = "Oficina do Zé")]
    pub nome: String,

    #[validate(custom(function = "validar_cpf"))]
    #[schema(example = "123.456.789-00")]
    pub cpf: Option<String>,

    #[validate(custom(function = "validar_cpf"))]
    pub cpf_representante: Option<String>,

    #[validate(custom(function = "validar_cnpj"))]
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: Option<String>,

    #[validate(length(max = 150, message = "A razão social deve ter no máximo 150 caracteres."))]
    pub razao_social: Option<String>,

    #[validate(length(max = 150, message = "O nome fantasia deve ter no máximo 150 caracteres."))]
    pub nome_fantasia: Option<String>,

    #[validate(length(max = 150, message = "O nome do representante deve ter no máximo 150 caracteres."))]
    pub nome_representante: Option<String>,

    #[validate(custom(function = "validar_telefone"))]
    #[schema(example = "(11) 3333-4444")]
    pub telefone: String,

    #[validate(email(message = "O e-mail da empresa é inválido."))]
    #[schema(example = "contato@oficinadoze.com")]
    pub email_empresa: String,

    #[validate(length(min = 1, max = 250, message = "O endereço é obrigatório (até 250 caracteres)."))]
    pub endereco: String,

    #[validate(email(message = "O e-mail do representante é inválido."))]
    pub email_representante: Option<String>,

    #[serde(default)]
    pub situacao_cadastral: i32,

    pub data_abertura: Option<NaiveDate>,

    pub data_situacao_cadastral: Option<NaiveDate>,

    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

// Pessoa física precisa de CPF; jurídica, de CNPJ e razão social.
fn validar_documento_prestador(dto: &PrestadorDto) -> Result<(), ValidationError> {
    let faltando = match dto.tipo_cadastro {
        TipoCadastro::PessoaFisica if dto.cpf.is_none() => {
            Some("O CPF é obrigatório para pessoa física.")
        }
        TipoCadastro::PessoaJuridica if dto.cnpj.is_none() || dto.razao_social.is_none() => {
            Some("CNPJ e razão social são obrigatórios para pessoa jurídica.")
        }
        _ => None,
    };

    match faltando {
        Some(message) => {
            let mut err = ValidationError::new("documento");
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

fn texto_opcional(valor: &mut Option<String>) {
    *valor = valor
        .as_deref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

impl PrestadorDto {
    pub fn normalizar(&mut self) {
        self.nome = self.nome.trim().to_string();
        self.endereco = self.endereco.trim().to_string();
        self.telefone = telefone_sem_pontuacao(&self.telefone);
        normalizar_opcional(&mut self.cpf, cpf_sem_pontuacao);
        normalizar_opcional(&mut self.cpf_representante, cpf_sem_pontuacao);
        normalizar_opcional(&mut self.cnpj, cnpj_sem_pontuacao);
        texto_opcional(&mut self.razao_social);
        texto_opcional(&mut self.nome_fantasia);
        texto_opcional(&mut self.nome_representante);
        texto_opcional(&mut self.email_representante);
    }
}

impl Prestador {
    pub fn from_dto(dto: PrestadorDto, id: Uuid, carimbo: &Carimbo) -> Self {
        Self {
            id,
            tipo_cadastro: dto.tipo_cadastro,
            nome: dto.nome,
            cpf: dto.cpf,
            cpf_representante: dto.cpf_representante,
            cnpj: dto.cnpj,
            razao_social: dto.razao_social,
            nome_fantasia: dto.nome_fantasia,
            nome_representante: dto.nome_representante,
            telefone: dto.telefone,
            email_empresa: dto.email_empresa,
            endereco: dto.endereco,
            email_representante: dto.email_representante,
            situacao_cadastral: dto.situacao_cadastral,
            data_abertura: dto.data_abertura,
            data_situacao_cadastral: dto.data_situacao_cadastral,
            auditoria: Auditoria::nova(carimbo),
        }
    }
}

impl From<Prestador> for PrestadorDto {
    fn from(p: Prestador) -> Self {
        Self {
            id: Some(p.id),
            tipo_cadastro: p.tipo_cadastro,
            nome: p.nome,
            cpf: p.cpf,
            cpf_representante: p.cpf_representante,
            cnpj: p.cnpj,
            razao_social: p.razao_social,
            nome_fantasia: p.nome_fantasia,
            nome_representante: p.nome_representante,
            telefone: p.telefone,
            email_empresa: p.email_empresa,
            endereco: p.endereco,
            email_representante: p.email_representante,
            situacao_cadastral: p.situacao_cadastral,
            data_abertura: p.data_abertura,
            data_situacao_cadastral: p.data_situacao_cadastral,
            auditoria: p.auditoria.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pessoa_fisica() -> PrestadorDto {
        serde_json::from_value(json!({
            "tipoCadastro": "PESSOA_FISICA",
            "nome": "Oficina do Zé",
            "cpf": "123.456.789-00",
            "telefone": "(11) 3333-4444",
            "emailEmpresa": "contato@oficinadoze.com",
            "endereco": "Rua A, 10"
        }))
        .unwrap()
    }

    #[test]
    fn individual_needs_cpf() {
        let mut dto = pessoa_fisica();
        dto.normalizar();
        assert_eq!(dto.cpf.as_deref(), Some("12345678900"));
        assert!(dto.validate().is_ok());

        dto.cpf = None;
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn company_needs_cnpj_and_legal_name() {
        let mut dto = pessoa_fisica();
        dto.tipo_cadastro = TipoCadastro::PessoaJuridica;
        dto.cnpj = Some("12.345.678/0001-99".into());
        dto.normalizar();
        assert!(dto.validate().is_err());

        dto.razao_social = Some("Oficina do Zé LTDA".into());
        assert!(dto.validate().is_ok());
        assert_eq!(dto.cnpj.as_deref(), Some("12345678000199"));
    }
}
