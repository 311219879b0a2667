use regex::Regex;
use std::sync::LazyLock;

// Regex para limpeza e validação
pub static RE_NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());
pub static RE_CPF_11: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{11})$").unwrap());
pub static RE_CPF_PARTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})(\d{3})(\d{3})(\d{2})$").unwrap());

/// Regex para gerar identificadores a partir dos rótulos.
/// `\s+` vira `_` e, em seguida, tudo o que não for caractere de palavra ASCII é removido
/// (acentos inclusive: "Código" -> "cdigo").
pub static RE_ESPACOS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
pub static RE_NAO_PALAVRA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Chaves de campos dinâmicos gravados por versões antigas do formulário.
pub static RE_CAMPO_DINAMICO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:op_|campo_)").unwrap());
