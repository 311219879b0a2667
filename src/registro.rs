use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{RE_CAMPO_DINAMICO, cpf_normalizado};

/// Campo do formulário que identifica o cliente.
pub const CAMPO_CPF: &str = "id-cpf";
/// Campo do formulário com o tipo de operação selecionado.
pub const CAMPO_TIPO_OPERACAO: &str = "tipoOperacao";

/// Retrato plano de todos os valores do formulário no momento do envio.
///
/// As chaves livres (identificadores dos controles) são mantidas na ordem de
/// inserção. `camposOperacao` guarda os valores dos campos dinâmicos na ordem
/// em que foram coletados.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registro {
    #[serde(
        rename = "camposOperacao",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub campos_operacao: Vec<String>,

    /// Identificadores dos campos dinâmicos, alinhados com `campos_operacao`.
    #[serde(
        rename = "camposOperacaoIds",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ids_campos_operacao: Vec<String>,

    #[serde(rename = "_savedAt", default, skip_serializing_if = "Option::is_none")]
    pub salvo_em: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub campos: Map<String, Value>,
}

impl Registro {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere (ou substitui) um valor livre.
    pub fn inserir(&mut self, chave: impl Into<String>, valor: impl Into<String>) {
        self.campos.insert(chave.into(), Value::String(valor.into()));
    }

    /// Valor livre como texto. Números e booleanos são convertidos; nulos,
    /// listas e objetos não têm representação textual.
    pub fn valor(&self, chave: &str) -> Option<String> {
        self.campos.get(chave).and_then(valor_como_texto)
    }

    /// Pares (chave, valor textual) na ordem de inserção.
    pub fn pares(&self) -> impl Iterator<Item = (&str, String)> {
        self.campos
            .iter()
            .filter_map(|(k, v)| valor_como_texto(v).map(|v| (k.as_str(), v)))
    }

    pub fn tipo_operacao(&self) -> Option<String> {
        self.valor(CAMPO_TIPO_OPERACAO).filter(|v| !v.is_empty())
    }

    /// CPF do registro já normalizado (11 dígitos), se válido.
    pub fn cpf(&self) -> Option<String> {
        self.valor(CAMPO_CPF).as_deref().and_then(cpf_normalizado)
    }

    /// Valores de chaves no formato antigo (`op_*`, `campo_*`), na ordem do registro.
    pub fn valores_dinamicos_legados(&self) -> Vec<String> {
        self.pares()
            .filter(|(k, _)| RE_CAMPO_DINAMICO.is_match(k))
            .map(|(_, v)| v)
            .collect()
    }

    /// Cópia sem o carimbo de gravação.
    pub fn sem_carimbo(&self) -> Self {
        Self {
            salvo_em: None,
            ..self.clone()
        }
    }
}

fn valor_como_texto(valor: &Value) -> Option<String> {
    match valor {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
