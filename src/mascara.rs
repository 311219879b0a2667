use crate::{RE_CPF_11, RE_CPF_PARTES, RE_NON_DIGITS};

/// Remove todos os caracteres que não são dígitos.
pub fn somente_digitos(valor: &str) -> String {
    RE_NON_DIGITS.replace_all(valor, "").into_owned()
}

/// Retorna o CPF com exatamente 11 dígitos, ou `None` se a forma normalizada
/// tiver qualquer outro tamanho.
pub fn cpf_normalizado(valor: &str) -> Option<String> {
    let digitos = somente_digitos(valor);
    RE_CPF_11.is_match(&digitos).then_some(digitos)
}

/// Formata um CPF de 11 dígitos como `000.000.000-00`.
/// Entradas com outro número de dígitos são devolvidas sem alteração.
pub fn formatar_cpf(cpf: &str) -> String {
    let digitos = somente_digitos(cpf);
    if RE_CPF_PARTES.is_match(&digitos) {
        RE_CPF_PARTES
            .replace(&digitos, "$1.$2.$3-$4")
            .into_owned()
    } else {
        cpf.to_string()
    }
}

/// Reinterpreta os dígitos digitados como valor de ponto fixo com duas casas decimais.
///
/// "35000" -> "350.00", "100" -> "1.00", "7" -> "7", "" -> "".
///
/// Pontuação já presente é descartada antes da conversão, de modo que
/// reaplicar a máscara sobre a mesma sequência de dígitos produz o mesmo resultado.
pub fn aplicar_mascara_ponto_fixo(valor: &str) -> String {
    let digitos = somente_digitos(valor);

    if digitos.len() < 2 {
        return digitos;
    }

    // Dígitos ASCII: o corte por bytes coincide com o corte por caracteres.
    let (parte_inteira, parte_decimal) = digitos.split_at(digitos.len() - 2);
    format!("{parte_inteira}.{parte_decimal}")
}
