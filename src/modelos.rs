use std::{collections::HashMap, fmt, str::FromStr};

use crate::PropostaError;

/// Texto da primeira opção das listas de seleção (não selecionável).
pub const PLACEHOLDER_SELECAO: &str = "Selecione...";

/// Rótulos cujos campos de texto recebem a máscara de ponto fixo.
pub const ROTULOS_PONTO_FIXO: [&str; 2] = ["Parcela", "Saldo Devedor"];

/// Categorias de operação de crédito que selecionam o modelo de campos dinâmicos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operacao {
    Portabilidade,
    Margem,
    Cartao,
    Refin,
}

impl Operacao {
    pub const TODAS: [Operacao; 4] = [
        Operacao::Portabilidade,
        Operacao::Margem,
        Operacao::Cartao,
        Operacao::Refin,
    ];

    /// Chave usada no seletor de operação e gravada em `tipoOperacao`.
    pub fn chave(&self) -> &'static str {
        match self {
            Operacao::Portabilidade => "portabilidade",
            Operacao::Margem => "margem",
            Operacao::Cartao => "cartao",
            Operacao::Refin => "refin",
        }
    }
}

impl fmt::Display for Operacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chave())
    }
}

impl FromStr for Operacao {
    type Err = PropostaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operacao::TODAS
            .into_iter()
            .find(|op| op.chave() == s)
            .ok_or_else(|| PropostaError::OperacaoDesconhecida(s.to_string()))
    }
}

/// Tipo de controle de um campo.
/// Na seleção, a primeira opção é o placeholder não selecionável.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipoCampo {
    Texto,
    Selecao(&'static [&'static str]),
}

/// Especificação declarativa de um campo dinâmico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EspecificacaoCampo {
    /// Texto exibido e chave das regras de formatação.
    pub rotulo: &'static str,
    pub tipo: TipoCampo,
    /// Dica de largura (classe de coluna). Não tem efeito semântico.
    pub layout: &'static str,
}

const fn texto(rotulo: &'static str, layout: &'static str) -> EspecificacaoCampo {
    EspecificacaoCampo {
        rotulo,
        tipo: TipoCampo::Texto,
        layout,
    }
}

const fn selecao(
    rotulo: &'static str,
    layout: &'static str,
    opcoes: &'static [&'static str],
) -> EspecificacaoCampo {
    EspecificacaoCampo {
        rotulo,
        tipo: TipoCampo::Selecao(opcoes),
        layout,
    }
}

const SIM_NAO: &[&str] = &[PLACEHOLDER_SELECAO, "Sim", "Não"];
const TIPOS_CARTAO: &[&str] = &[PLACEHOLDER_SELECAO, "RMC", "RCC"];

// --- Modelos de Campos por Operação ---

const MODELO_PORTABILIDADE: &[EspecificacaoCampo] = &[
    texto("Parcela", "col-md-1"),
    texto("Código da Tabela", "col-md-2"),
    texto("Nº do Contrato", "col-md-2"),
    texto("Banco Origem", "col-md-2"),
    texto("Código do Banco Origem", "col-md-3"),
    texto("Saldo Devedor", "col-md-2"),
    texto("Prazo Total", "col-md-2"),
    texto("Prazo Restante", "col-md-2"),
    selecao("Refinanciamento", "col-md-2", SIM_NAO),
    texto("Código da Tabela Refin", "col-md-3"),
    texto("Prazo do Refinanciamento", "col-md-3"),
    texto("Seguro a ser Adicionado", "col-md-3"),
];

const MODELO_MARGEM: &[EspecificacaoCampo] = &[
    texto("Parcela", "col-md-3"),
    texto("Código da Tabela", "col-md-3"),
    texto("Prazo", "col-md-3"),
    texto("Seguro a ser Adicionado", "col-md-3"),
];

const MODELO_CARTAO: &[EspecificacaoCampo] = &[
    texto("Parcela", "col-md-2"),
    texto("Código da Tabela", "col-md-2"),
    texto("Seguro a ser Adicionado", "col-md-3"),
    selecao("Tipo do Cartão", "col-md-2", TIPOS_CARTAO),
    selecao("Deseja Saque", "col-md-2", SIM_NAO),
];

const MODELO_REFIN: &[EspecificacaoCampo] = &[
    texto("Parcela", "col-md-3"),
    texto("Código da Tabela", "col-md-3"),
    texto("Prazo", "col-md-3"),
    texto("Seguro a ser Adicionado", "col-md-3"),
];

/// Tamanho máximo (em caracteres) por rótulo.
const TAMANHO_MAXIMO: &[(&str, usize)] = &[
    ("Parcela", 7),
    ("Saldo Devedor", 9),
    ("Nº do Contrato", 30),
    ("Código do Banco Origem", 3),
    ("Prazo Total", 3),
    ("Prazo Restante", 3),
    ("Prazo do Refinanciamento", 3),
    ("Prazo", 3),
];

/// Configuração imutável do motor de campos: modelos por chave de operação
/// e a tabela de tamanho máximo por rótulo.
///
/// Construída uma vez na inicialização e passada explicitamente a quem precisa.
#[derive(Debug, Clone)]
pub struct RegistroModelos {
    modelos: HashMap<String, Vec<EspecificacaoCampo>>,
    tamanho_maximo: HashMap<&'static str, usize>,
}

impl Default for RegistroModelos {
    fn default() -> Self {
        Self::padrao()
    }
}

impl RegistroModelos {
    /// Os quatro modelos do formulário de proposta.
    pub fn padrao() -> Self {
        let modelos = Operacao::TODAS
            .into_iter()
            .map(|op| {
                let campos = match op {
                    Operacao::Portabilidade => MODELO_PORTABILIDADE,
                    Operacao::Margem => MODELO_MARGEM,
                    Operacao::Cartao => MODELO_CARTAO,
                    Operacao::Refin => MODELO_REFIN,
                };
                (op.chave().to_string(), campos.to_vec())
            })
            .collect();

        Self::novo(modelos, TAMANHO_MAXIMO.iter().copied().collect())
    }

    /// Registro com modelos arbitrários (útil para testes e variações do formulário).
    pub fn novo(
        modelos: HashMap<String, Vec<EspecificacaoCampo>>,
        tamanho_maximo: HashMap<&'static str, usize>,
    ) -> Self {
        Self {
            modelos,
            tamanho_maximo,
        }
    }

    /// Campos do modelo. Chaves desconhecidas resultam em lista vazia.
    pub fn modelo(&self, chave_operacao: &str) -> &[EspecificacaoCampo] {
        self.modelos
            .get(chave_operacao)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn tamanho_maximo(&self, rotulo: &str) -> Option<usize> {
        self.tamanho_maximo.get(rotulo).copied()
    }

    /// Chaves de operação registradas, em ordem alfabética.
    pub fn chaves(&self) -> Vec<&str> {
        let mut chaves: Vec<&str> = self.modelos.keys().map(String::as_str).collect();
        chaves.sort_unstable();
        chaves
    }
}
