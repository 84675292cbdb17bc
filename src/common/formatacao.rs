// src/common/formatacao.rs
//
// Limpeza de documentos e telefones antes de validar e gravar.

use rust_decimal::Decimal;
use validator::ValidationError;

fn remover(valor: &str, pontuacao: &[char]) -> String {
    valor
        .trim()
        .chars()
        .filter(|c| !pontuacao.contains(c) && !c.is_whitespace())
        .collect()
}

pub fn cpf_sem_pontuacao(cpf: &str) -> String {
    remover(cpf, &['.', '-'])
}

pub fn rg_sem_pontuacao(rg: &str) -> String {
    remover(rg, &['.', '-']).to_uppercase()
}

pub fn cnpj_sem_pontuacao(cnpj: &str) -> String {
    remover(cnpj, &['.', '-', '/'])
}

pub fn telefone_sem_pontuacao(telefone: &str) -> String {
    remover(telefone, &['(', ')', '-', '+'])
}

// "abc-1d23" -> "ABC1D23"
pub fn placa_normalizada(placa: &str) -> String {
    remover(placa, &['-']).to_uppercase()
}

/// Aplica a limpeza num campo opcional; texto que fica vazio vira `None`.
pub fn normalizar_opcional(valor: &mut Option<String>, limpar: fn(&str) -> String) {
    *valor = valor.as_deref().map(limpar).filter(|v| !v.is_empty());
}

fn digitos(valor: &str, tamanhos: &[usize], code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if valor.chars().all(|c| c.is_ascii_digit()) && tamanhos.contains(&valor.len()) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}

// Validadores usados pelo `#[validate(custom(...))]` dos DTOs.
// Rodam depois da limpeza, então só conferem quantidade de dígitos.

pub fn validar_cpf(cpf: &str) -> Result<(), ValidationError> {
    digitos(cpf, &[11], "cpf", "O CPF deve conter 11 dígitos.")
}

pub fn validar_cnpj(cnpj: &str) -> Result<(), ValidationError> {
    digitos(cnpj, &[14], "cnpj", "O CNPJ deve conter 14 dígitos.")
}

pub fn validar_telefone(telefone: &str) -> Result<(), ValidationError> {
    digitos(telefone, &[10, 11, 12, 13], "telefone", "O telefone deve conter DDD e número.")
}

pub fn validar_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cpf_punctuation() {
        assert_eq!(cpf_sem_pontuacao("123.456.789-00"), "12345678900");
        assert_eq!(cpf_sem_pontuacao(" 12345678900 "), "12345678900");
    }

    #[test]
    fn strips_rg_and_keeps_check_letter() {
        assert_eq!(rg_sem_pontuacao("12.345.678-x"), "12345678X");
    }

    #[test]
    fn strips_phone_and_cnpj() {
        assert_eq!(telefone_sem_pontuacao("(11) 98765-4321"), "11987654321");
        assert_eq!(telefone_sem_pontuacao("+55 (11) 3333-4444"), "551133334444");
        assert_eq!(cnpj_sem_pontuacao("12.345.678/0001-99"), "12345678000199");
    }

    #[test]
    fn normalizes_plate() {
        assert_eq!(placa_normalizada("abc-1d23"), "ABC1D23");
    }

    #[test]
    fn optional_field_that_becomes_empty_is_cleared() {
        let mut rg = Some(" .- ".to_string());
        normalizar_opcional(&mut rg, rg_sem_pontuacao);
        assert_eq!(rg, None);

        let mut cpf = Some("111.222.333-44".to_string());
        normalizar_opcional(&mut cpf, cpf_sem_pontuacao);
        assert_eq!(cpf.as_deref(), Some("11122233344"));
    }

    #[test]
    fn digit_validators() {
        assert!(validar_cpf("12345678900").is_ok());
        assert!(validar_cpf("1234567890").is_err());
        assert!(validar_cpf("1234567890a").is_err());
        assert!(validar_cnpj("12345678000199").is_ok());
        assert!(validar_telefone("1133334444").is_ok());
        assert!(validar_telefone("3333").is_err());
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(validar_nao_negativo(&Decimal::new(1990, 2)).is_ok());
        assert!(validar_nao_negativo(&Decimal::ZERO).is_ok());
        assert!(validar_nao_negativo(&Decimal::new(-1, 0)).is_err());
    }
}
