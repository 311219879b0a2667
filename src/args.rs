use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::{PropostaError, PropostaResult};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Clear screen
    #[arg(short, long, default_value_t = false)]
    clear: bool,

    /// Diretório onde os registros são gravados (um arquivo JSON por chave)
    #[arg(short, long, env = "PROPOSTA_DADOS", default_value = "propostas")]
    dados: PathBuf,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    comando: Comando,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Comando {
    /// Exibir os campos dinâmicos de uma operação
    ///
    /// Operações: portabilidade, margem, cartao, refin
    Campos { operacao: String },

    /// Gravar um registro a partir de um arquivo JSON
    Salvar { arquivo: PathBuf },

    /// Exibir o registro gravado para o CPF
    Recuperar { cpf: String },

    /// Exibir o envio mais recente
    Ultimo,

    /// Gerar o documento da proposta gravada para o CPF
    Exportar {
        cpf: String,

        /// Formato do documento
        #[arg(short, long, value_enum, default_value_t = Formato::Csv)]
        formato: Formato,

        /// Imagem PNG do cabeçalho
        #[arg(short, long)]
        logo: Option<PathBuf>,

        /// Diretório de saída
        #[arg(short, long, default_value = ".")]
        saida: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formato {
    Csv,
    Json,
}

#[derive(Debug)]
pub struct Config {
    pub clear: bool,
    pub dados: PathBuf,
    pub verbose: bool,
    pub comando: Comando,
}

pub fn get_config() -> PropostaResult<Config> {
    config_from(Arguments::parse())
}

fn config_from(args: Arguments) -> PropostaResult<Config> {
    // A logo é opcional (falhas de leitura só removem a imagem), mas um
    // diretório no lugar do arquivo é erro de uso.
    if let Comando::Exportar { logo: Some(logo), .. } = &args.comando {
        if logo.is_dir() {
            return Err(PropostaError::Config(format!(
                "a logo deve ser um arquivo: {}",
                logo.display()
            )));
        }
    }

    if args.dados.is_file() {
        return Err(PropostaError::Config(format!(
            "o diretório de dados é um arquivo: {}",
            args.dados.display()
        )));
    }

    Ok(Config {
        clear: args.clear,
        dados: args.dados,
        verbose: args.verbose,
        comando: args.comando,
    })
}
