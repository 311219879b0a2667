use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type PropostaResult<T> = Result<T, PropostaError>;

#[derive(Error, Debug)]
pub enum PropostaError {
    #[error(
        "Campos obrigatórios não preenchidos: {campos:?}\n\
        Preencha todos os campos obrigatórios antes de enviar."
    )]
    CamposObrigatorios { campos: Vec<String> },

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("CPF inválido: {cpf}. Esperado 11 dígitos, encontrado {length}")]
    CpfInvalido { cpf: String, length: usize },

    #[error("Erro na geração do CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Falha ao acessar arquivo!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source]
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error("Erro de serialização JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Tipo de operação desconhecido: <{0}>\n\
        Operações válidas: portabilidade, margem, cartao, refin"
    )]
    OperacaoDesconhecida(String),

    #[error("Registro do CPF {cpf} está corrompido: {motivo}")]
    RegistroCorrompido { cpf: String, motivo: String },

    #[error("Nenhum registro encontrado para o CPF {cpf}")]
    RegistroNaoEncontrado { cpf: String },
}

impl PropostaError {
    /// Anexa o caminho do arquivo a um erro de I/O.
    pub fn io_em(source: io::Error, arquivo: impl Into<PathBuf>) -> Self {
        PropostaError::IoReader {
            source,
            arquivo: arquivo.into(),
        }
    }
}
