//! Documento exportável de cada envio.
//!
//! O layout do PDF final é responsabilidade de um renderizador externo; aqui
//! o documento é montado como estrutura (título, logo opcional, seções de
//! pares rótulo/valor) e entregue a um [`Renderizador`].

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use tracing::warn;

use crate::{CAMPO_TIPO_OPERACAO, PropostaError, PropostaResult, Registro};

pub const TITULO_DOCUMENTO: &str = "Formulário de Proposta";
pub const SEM_OBSERVACOES: &str = "Nenhuma observação adicionada.";

const ASSINATURA_PNG: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Seções fixas: (título, [(rótulo, chave no registro)]).
const SECOES_FIXAS: &[(&str, &[(&str, &str)])] = &[
    (
        "DADOS PESSOAIS",
        &[
            ("CPF", "id-cpf"),
            ("Nome", "id-nome"),
            ("Nascimento", "id-nascimento"),
            ("RG", "id-rg"),
            ("UF do RG", "id-uf-rg"),
            ("Emissão", "id-emissao"),
            ("Mãe", "id-mae"),
            ("Pai", "id-pai"),
            ("Naturalidade", "id-naturalidade"),
            ("UF Naturalidade", "id-uf-naturalidade"),
            ("Celular", "id-celular"),
            ("E-mail", "id-email"),
        ],
    ),
    (
        "DADOS DO CONVÊNIO",
        &[
            ("Orgão", "id-orgao"),
            ("Espécie/Secretaria", "id-especie"),
            ("Matrícula", "id-matricula"),
            ("UF", "uf-endereco"),
        ],
    ),
    (
        "ENDEREÇO",
        &[
            ("CEP", "id-cep"),
            ("Endereço", "id-endereco"),
            ("Número", "id-numero-endereco"),
            ("Complemento", "id-complemento-endereco"),
            ("Bairro", "id-bairro"),
            ("Cidade", "id-cidade"),
            ("UF", "uf-endereco"),
        ],
    ),
    (
        "DADOS BANCÁRIOS",
        &[
            ("Banco", "banco"),
            ("Agência", "agencia"),
            ("Conta", "conta"),
            ("Tipo", "tipo-conta"),
            ("Dígito Verificador", "dv"),
        ],
    ),
];

/// Imagem PNG usada no cabeçalho do documento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    bytes: Vec<u8>,
}

impl Logo {
    /// Aceita somente conteúdo com a assinatura PNG.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        bytes.starts_with(&ASSINATURA_PNG).then_some(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Carrega a logo. Qualquer falha resulta em documento sem imagem.
pub fn carregar_logo(caminho: &Path) -> Option<Logo> {
    match fs::read(caminho) {
        Ok(bytes) => {
            let logo = Logo::from_bytes(bytes);
            if logo.is_none() {
                warn!(
                    arquivo = %caminho.display(),
                    "logo não é um PNG válido; documento sem imagem"
                );
            }
            logo
        }
        Err(e) => {
            warn!(
                arquivo = %caminho.display(),
                erro = %e,
                "logo indisponível; documento sem imagem"
            );
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Secao {
    pub titulo: String,
    pub linhas: Vec<(String, String)>,
}

impl Secao {
    fn new(titulo: &str, linhas: Vec<(String, String)>) -> Self {
        Self {
            titulo: titulo.to_string(),
            linhas,
        }
    }
}

/// Documento de um envio, independente do formato de saída.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Documento {
    pub titulo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub secoes: Vec<Secao>,
    pub observacoes: String,
    /// Nome do arquivo sem extensão: `<nome> - <operação>`.
    #[serde(skip)]
    pub nome_base: String,
}

impl Documento {
    /// Monta o documento a partir do registro e dos pares (rótulo, valor)
    /// dos campos dinâmicos exibidos.
    pub fn montar(
        registro: &Registro,
        campos_dinamicos: &[(String, String)],
        logo: Option<&Logo>,
    ) -> Self {
        let valor = |chave: &str| registro.valor(chave).unwrap_or_default();

        let nome = registro
            .valor("id-nome")
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Sem Nome".to_string());
        let operacao = registro
            .valor(CAMPO_TIPO_OPERACAO)
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| "Não Informada".to_string());

        let mut secoes: Vec<Secao> = SECOES_FIXAS
            .iter()
            .map(|&(titulo, campos)| {
                let linhas = campos
                    .iter()
                    .map(|&(rotulo, chave)| (rotulo.to_string(), valor(chave)))
                    .collect();
                Secao::new(titulo, linhas)
            })
            .collect();

        secoes.push(Secao::new(
            "TIPO DE OPERAÇÃO",
            vec![("Operação Selecionada".to_string(), operacao.clone())],
        ));

        if !campos_dinamicos.is_empty() {
            secoes.push(Secao::new("CAMPOS DA OPERAÇÃO", campos_dinamicos.to_vec()));
        }

        let observacoes = registro
            .valor("id-observacoes")
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| SEM_OBSERVACOES.to_string());

        Self {
            titulo: TITULO_DOCUMENTO.to_string(),
            logo: logo.map(Logo::data_url),
            secoes,
            observacoes,
            nome_base: nome_de_arquivo_seguro(&format!("{nome} - {operacao}")),
        }
    }
}

/// Separadores de caminho não podem vir do nome digitado.
fn nome_de_arquivo_seguro(nome: &str) -> String {
    nome.chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect()
}

/// Colaborador que transforma o documento num formato de saída.
pub trait Renderizador {
    fn extensao(&self) -> &'static str;
    fn renderizar(&self, documento: &Documento, destino: &mut dyn Write) -> PropostaResult<()>;
}

/// Tabela CSV (`;`): seção, campo, valor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderizadorCsv;

impl Renderizador for RenderizadorCsv {
    fn extensao(&self) -> &'static str {
        "csv"
    }

    fn renderizar(&self, documento: &Documento, destino: &mut dyn Write) -> PropostaResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(destino);

        wtr.write_record(["Seção", "Campo", "Valor"])?;
        wtr.write_record(["", "Título", documento.titulo.as_str()])?;

        for secao in &documento.secoes {
            for (rotulo, valor) in &secao.linhas {
                wtr.write_record([secao.titulo.as_str(), rotulo.as_str(), valor.as_str()])?;
            }
        }

        wtr.write_record(["OBSERVAÇÕES", "Observações", documento.observacoes.as_str()])?;
        wtr.flush()?;
        Ok(())
    }
}

/// Definição do documento em JSON, pronta para um gerador de PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderizadorJson;

impl Renderizador for RenderizadorJson {
    fn extensao(&self) -> &'static str {
        "json"
    }

    fn renderizar(&self, documento: &Documento, destino: &mut dyn Write) -> PropostaResult<()> {
        serde_json::to_writer_pretty(&mut *destino, documento)?;
        writeln!(destino)?;
        Ok(())
    }
}

/// Grava o documento em `<diretório>/<nome> - <operação>.<extensão>`.
pub fn exportar_documento(
    documento: &Documento,
    renderizador: &dyn Renderizador,
    diretorio: &Path,
) -> PropostaResult<PathBuf> {
    fs::create_dir_all(diretorio).map_err(|e| PropostaError::io_em(e, diretorio))?;

    let caminho = diretorio.join(format!(
        "{}.{}",
        documento.nome_base,
        renderizador.extensao()
    ));

    let file = File::create(&caminho).map_err(|e| PropostaError::io_em(e, &caminho))?;
    let mut writer = BufWriter::new(file);
    renderizador.renderizar(documento, &mut writer)?;
    writer.flush()?;

    Ok(caminho)
}
