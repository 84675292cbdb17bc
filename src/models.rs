pub mod auditoria;
pub mod auth;
pub mod categoria_servico;
pub mod cliente;
pub mod funcionario;
pub mod prestacao_servico;
pub mod prestador;
pub mod produto;
pub mod servico;
pub mod veiculo;
