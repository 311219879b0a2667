use std::process::Command;

use crate::{
    ConteinerMemoria, Gravacao, PropostaResult, Registro, TipoControle, chave_do_cliente,
};

/// Limpar a tela.
pub fn clear_screen(clear_screen: bool) -> PropostaResult<()> {
    if clear_screen {
        if cfg!(target_os = "windows") {
            // No Windows, 'cls' é um comando interno do 'cmd'.
            Command::new("cmd").args(["/c", "cls"]).status()?;
        } else {
            Command::new("clear").status()?;
        }
    }

    Ok(())
}

/// Exibe a descrição e a versão do programa.
pub fn imprimir_versao_do_programa() {
    let descr = [
        "Este programa mantém o formulário de proposta de crédito.",
        "Os campos da operação (portabilidade, margem, cartão, refin) vêm de modelos fixos.",
        "Cada envio é gravado pelo CPF do cliente e também como envio mais recente.",
        "Propostas gravadas podem ser exportadas como documento (CSV ou JSON).",
    ];

    for line in &descr {
        println!(" {}", line);
    }

    println!("\n versão: {}\n", env!("CARGO_PKG_VERSION"));
}

/// Tabela dos campos dinâmicos: id, rótulo, tipo, tamanho máximo e máscara/opções.
pub fn imprimir_campos(operacao: &str, conteiner: &ConteinerMemoria) {
    let campos = conteiner.campos();

    let max_id = campos.iter().map(|c| c.id.chars().count()).max().unwrap_or_default();
    let max_rotulo = campos
        .iter()
        .map(|c| c.rotulo.chars().count())
        .max()
        .unwrap_or_default();

    println!(" --- Campos da operação: {} ({}) ---", operacao, campos.len());

    for (i, campo) in campos.iter().enumerate() {
        let tamanho = campo
            .tamanho_maximo
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());

        let detalhe = match &campo.controle {
            TipoControle::Texto { mascara: Some(m) } => format!("texto   máscara {m:?}"),
            TipoControle::Texto { mascara: None } => "texto".to_string(),
            TipoControle::Selecao { opcoes } => {
                let textos: Vec<&str> = opcoes.iter().map(|o| o.texto.as_str()).collect();
                format!("seleção [{}]", textos.join(" | "))
            }
        };

        println!(
            "{:4}: {:<max_id$}  {:<max_rotulo$}  máx {:>3}  {}",
            i + 1,
            campo.id,
            campo.rotulo,
            tamanho,
            detalhe
        );
    }
    println!();
}

pub fn imprimir_gravacao(gravacao: &Gravacao) {
    match gravacao {
        Gravacao::PorCpf(cpf) => println!(
            " Registro gravado em <{}> e como envio mais recente.",
            chave_do_cliente(cpf)
        ),
        Gravacao::SomenteUltimoEnvio => println!(
            " CPF inválido: registro gravado somente como envio mais recente."
        ),
    }
}

pub fn imprimir_registro(registro: &Registro) -> PropostaResult<()> {
    println!("{}", serde_json::to_string_pretty(registro)?);
    Ok(())
}
