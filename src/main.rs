use execution_time::ExecutionTime;
use std::{fs, process};

use proposta_credito::{
    ArmazenamentoArquivo, Comando, Consulta, ConteinerMemoria, Documento, Formato, Formulario,
    Operacao, PropostaError, PropostaResult, Registro, RegistroModelos, Renderizador,
    RenderizadorCsv, RenderizadorJson, Repositorio, carregar_logo, clear_screen,
    construir_campos, exportar_documento, get_config, imprimir_campos, imprimir_gravacao,
    imprimir_registro, imprimir_versao_do_programa, logging, somente_digitos,
};

fn main() {
    // Erros chegam ao usuário sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO]: {err}");
        process::exit(1);
    }
}

fn run() -> PropostaResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;
    logging::init(config.verbose);

    // 2. Setup inicial
    clear_screen(config.clear)?;
    imprimir_versao_do_programa();

    if config.verbose {
        println!("{:#?}\n", config);
    }

    // 3. Configuração imutável dos modelos e repositório local
    let modelos = RegistroModelos::padrao();
    let mut repositorio = Repositorio::new(ArmazenamentoArquivo::new(&config.dados));

    match config.comando {
        Comando::Campos { operacao } => {
            let operacao: Operacao = operacao.parse()?;
            let mut conteiner = ConteinerMemoria::new();
            construir_campos(&modelos, operacao.chave(), &mut conteiner);
            imprimir_campos(operacao.chave(), &conteiner);
        }
        Comando::Salvar { arquivo } => {
            let conteudo =
                fs::read_to_string(&arquivo).map_err(|e| PropostaError::io_em(e, &arquivo))?;
            let registro: Registro = serde_json::from_str(&conteudo)?;
            let gravacao = repositorio.salvar(&registro)?;
            imprimir_gravacao(&gravacao);
        }
        Comando::Recuperar { cpf } => {
            let registro = registro_do_cpf(&repositorio, &cpf)?;
            imprimir_registro(&registro)?;
        }
        Comando::Ultimo => match repositorio.ultimo_envio()? {
            Consulta::Encontrado(registro) => imprimir_registro(&registro)?,
            Consulta::NaoEncontrado => println!(" Nenhum envio gravado."),
            Consulta::Corrompido(motivo) => {
                return Err(PropostaError::RegistroCorrompido {
                    cpf: "-".to_string(),
                    motivo,
                });
            }
        },
        Comando::Exportar {
            cpf,
            formato,
            logo,
            saida,
        } => {
            let registro = registro_do_cpf(&repositorio, &cpf)?;

            // O documento reflete o formulário preenchido, como na tela.
            let mut formulario = Formulario::new(&modelos);
            formulario.preencher(Some(&registro));

            let logo = logo.as_deref().and_then(carregar_logo);
            let documento = Documento::montar(
                &formulario.coletar(),
                &formulario.dinamicos().pares_rotulo_valor(),
                logo.as_ref(),
            );

            let renderizador: &dyn Renderizador = match formato {
                Formato::Csv => &RenderizadorCsv,
                Formato::Json => &RenderizadorJson,
            };

            let caminho = exportar_documento(&documento, renderizador, &saida)?;
            println!(" ---> Documento gerado: <{}>", caminho.display());
        }
    }

    println!();
    timer.print_elapsed_time();

    Ok(())
}

/// Consulta com erros explícitos para a linha de comando.
fn registro_do_cpf(
    repositorio: &Repositorio<ArmazenamentoArquivo>,
    cpf: &str,
) -> PropostaResult<Registro> {
    let digitos = somente_digitos(cpf);
    if digitos.len() != 11 {
        return Err(PropostaError::CpfInvalido {
            cpf: cpf.to_string(),
            length: digitos.len(),
        });
    }

    match repositorio.consultar(&digitos)? {
        Consulta::Encontrado(registro) => Ok(registro),
        Consulta::NaoEncontrado => Err(PropostaError::RegistroNaoEncontrado { cpf: digitos }),
        Consulta::Corrompido(motivo) => Err(PropostaError::RegistroCorrompido {
            cpf: digitos,
            motivo,
        }),
    }
}
