use chrono::Utc;
use tracing::{info, warn};

use crate::{Armazenamento, PropostaResult, Registro, cpf_normalizado};

/// Prefixo das entradas identificadas por CPF.
pub const PREFIXO_CLIENTE: &str = "cliente_";
/// Entrada compartilhada com o envio mais recente, válido ou não.
pub const CHAVE_ULTIMO_ENVIO: &str = "formularioProposta";

/// Onde um registro foi gravado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gravacao {
    /// Gravado sob `cliente_<cpf>` e também na entrada do último envio.
    PorCpf(String),
    /// CPF ausente ou sem 11 dígitos: gravado somente na entrada do último envio.
    SomenteUltimoEnvio,
}

/// Resultado de uma consulta por CPF.
#[derive(Debug, Clone, PartialEq)]
pub enum Consulta {
    Encontrado(Registro),
    NaoEncontrado,
    /// Existe uma entrada, mas ela não é um registro válido.
    Corrompido(String),
}

impl Consulta {
    pub fn registro(self) -> Option<Registro> {
        match self {
            Consulta::Encontrado(registro) => Some(registro),
            Consulta::NaoEncontrado | Consulta::Corrompido(_) => None,
        }
    }
}

pub fn chave_do_cliente(cpf: &str) -> String {
    format!("{PREFIXO_CLIENTE}{cpf}")
}

/// Repositório de registros do formulário, indexados pelo CPF normalizado.
#[derive(Debug, Clone, Default)]
pub struct Repositorio<A> {
    armazenamento: A,
}

impl<A: Armazenamento> Repositorio<A> {
    pub fn new(armazenamento: A) -> Self {
        Self { armazenamento }
    }

    pub fn armazenamento(&self) -> &A {
        &self.armazenamento
    }

    /// Grava o registro com o carimbo `_savedAt`.
    ///
    /// CPF malformado não interrompe a gravação: o registro vai apenas para a
    /// entrada do último envio. Somente falhas do meio de armazenamento
    /// resultam em erro.
    pub fn salvar(&mut self, registro: &Registro) -> PropostaResult<Gravacao> {
        let mut carimbado = registro.clone();
        carimbado.salvo_em = Some(Utc::now());
        let serializado = serde_json::to_string(&carimbado)?;

        let gravacao = match registro.cpf() {
            Some(cpf) => {
                self.armazenamento.gravar(&chave_do_cliente(&cpf), &serializado)?;
                info!(cpf = %cpf, "registro gravado");
                Gravacao::PorCpf(cpf)
            }
            None => {
                warn!("CPF inválido, gravando somente na entrada do último envio");
                Gravacao::SomenteUltimoEnvio
            }
        };

        self.armazenamento.gravar(CHAVE_ULTIMO_ENVIO, &serializado)?;

        Ok(gravacao)
    }

    /// Consulta detalhada por CPF: distingue "nunca gravado" de "gravado mas ilegível".
    ///
    /// CPF que não normaliza para 11 dígitos resulta em `NaoEncontrado` sem
    /// acessar o armazenamento.
    pub fn consultar(&self, cpf: &str) -> PropostaResult<Consulta> {
        let Some(cpf) = cpf_normalizado(cpf) else {
            return Ok(Consulta::NaoEncontrado);
        };

        let conteudo = self.armazenamento.ler(&chave_do_cliente(&cpf))?;
        Ok(interpretar(conteudo))
    }

    /// Recupera o registro por CPF. Qualquer falha (CPF inválido, ausência,
    /// conteúdo corrompido ou erro de leitura) resulta em `None`.
    pub fn recuperar(&self, cpf: &str) -> Option<Registro> {
        match self.consultar(cpf) {
            Ok(Consulta::Corrompido(motivo)) => {
                warn!(%motivo, "registro corrompido ignorado");
                None
            }
            Ok(consulta) => consulta.registro(),
            Err(err) => {
                warn!(%err, "falha ao ler o armazenamento");
                None
            }
        }
    }

    /// Envio mais recente, independentemente da validade do CPF.
    pub fn ultimo_envio(&self) -> PropostaResult<Consulta> {
        let conteudo = self.armazenamento.ler(CHAVE_ULTIMO_ENVIO)?;
        Ok(interpretar(conteudo))
    }
}

fn interpretar(conteudo: Option<String>) -> Consulta {
    match conteudo {
        None => Consulta::NaoEncontrado,
        Some(texto) if texto.is_empty() => Consulta::NaoEncontrado,
        Some(texto) => match serde_json::from_str::<Registro>(&texto) {
            Ok(registro) => Consulta::Encontrado(registro),
            Err(e) => Consulta::Corrompido(e.to_string()),
        },
    }
}
