// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    auditoria::{Auditoria, AuditoriaDto, Carimbo},
    prestador::PrestadorDto,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Perfil {
    Prestador = 0,
    Funcionario = 1,
}

// Login, vindo da tabela `usuario`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub funcionario_id: Option<Uuid>,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub perfil: Perfil,
    #[sqlx(flatten)]
    pub auditoria: Auditoria,
}

// O que o `/me` devolve: nunca o hash da senha.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioDto {
    pub id: Uuid,
    pub prestador_id: Uuid,
    pub funcionario_id: Option<Uuid>,
    pub nome: String,
    pub email: String,
    pub perfil: Perfil,
    #[serde(flatten)]
    pub auditoria: AuditoriaDto,
}

impl From<Usuario> for UsuarioDto {
    fn from(u: Usuario) -> Self {
        Self {
            id: u.id,
            prestador_id: u.prestador_id,
            funcionario_id: u.funcionario_id,
            nome: u.nome,
            email: u.email,
            perfil: u.perfil,
            auditoria: u.auditoria.into(),
        }
    }
}

// Cadastro do prestador junto com o login do dono
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarPrestadorPayload {
    #[validate(nested)]
    pub prestador: PrestadorDto,

    #[validate(length(min = 1, max = 100, message = "O nome do usuário é obrigatório."))]
    #[schema(example = "José Almeida")]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ze@oficinadoze.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[schema(example = "senha123")]
    pub senha: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ze@oficinadoze.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[schema(example = "senha123")]
    pub senha: String,
}

// Login para um funcionário já cadastrado
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarFuncionarioLoginPayload {
    pub funcionario_id: Uuid,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expiracao: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // id do usuário
    pub nome: String,
    pub email: String,
    pub prestador_id: Uuid,
    pub perfil: Perfil,
    pub exp: usize,
    pub iat: usize,
}

// Quem está chamando, montado só a partir do token validado.
#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioAutenticado {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub prestador_id: Uuid,
    pub perfil: Perfil,
}

impl From<Claims> for UsuarioAutenticado {
    fn from(c: Claims) -> Self {
        Self {
            id: c.sub,
            nome: c.nome,
            email: c.email,
            prestador_id: c.prestador_id,
            perfil: c.perfil,
        }
    }
}

impl UsuarioAutenticado {
    pub fn carimbo(&self) -> Carimbo {
        Carimbo {
            usuario_id: self.id,
            usuario_nome: self.nome.clone(),
            prestador_id: self.prestador_id,
        }
    }
}
