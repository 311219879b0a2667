//! Motor de campos dinâmicos.
//!
//! A partir de um modelo declarativo ([`EspecificacaoCampo`]), materializa
//! controles rotulados num contêiner qualquer que implemente
//! [`ConstrutorDeCampos`]. O motor não conhece toolkit de interface:
//! [`ConteinerMemoria`] é a implementação sem interface gráfica usada pelo
//! formulário e pelos testes.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    EspecificacaoCampo, RE_ESPACOS, RE_NAO_PALAVRA, ROTULOS_PONTO_FIXO, RegistroModelos,
    TipoCampo, aplicar_mascara_ponto_fixo,
};

/// Reformatação aplicada a cada entrada do usuário num campo de texto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mascara {
    /// Dígitos com duas casas decimais implícitas.
    PontoFixo,
}

impl Mascara {
    pub fn aplicar(&self, valor: &str) -> String {
        match self {
            Mascara::PontoFixo => aplicar_mascara_ponto_fixo(valor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcaoSelecao {
    pub texto: String,
    pub desabilitada: bool,
    pub selecionada: bool,
}

/// Atributos comuns a qualquer controle criado pelo motor.
#[derive(Debug, Clone, Copy)]
pub struct DescricaoControle<'a> {
    pub id: &'a str,
    pub rotulo: &'a str,
    pub layout: &'a str,
    pub tamanho_maximo: Option<usize>,
}

/// Capacidades mínimas que o motor exige de um contêiner de campos.
pub trait ConstrutorDeCampos {
    type Controle;

    /// Remove todos os controles existentes.
    fn limpar(&mut self);

    fn criar_texto(&mut self, descricao: DescricaoControle<'_>, mascara: Option<Mascara>)
    -> Self::Controle;

    fn criar_selecao(
        &mut self,
        descricao: DescricaoControle<'_>,
        opcoes: Vec<OpcaoSelecao>,
    ) -> Self::Controle;

    fn anexar(&mut self, controle: Self::Controle);
}

/// Gera o identificador do campo: rótulo em minúsculas, espaços trocados por `_`,
/// demais caracteres fora de `[A-Za-z0-9_]` removidos, seguido do contador de
/// ocorrências desse identificador base na construção atual.
pub fn gerar_identificador(rotulo: &str, contadores: &mut HashMap<String, usize>) -> String {
    let minusculo = rotulo.to_lowercase();
    let com_sublinhado = RE_ESPACOS.replace_all(&minusculo, "_");
    let base = RE_NAO_PALAVRA.replace_all(&com_sublinhado, "").into_owned();

    let contador = contadores.entry(base.clone()).or_insert(0);
    *contador += 1;

    format!("{base}_{contador}")
}

/// Reconstrói por completo os campos dinâmicos da operação no contêiner.
///
/// Chaves de operação desconhecidas produzem um contêiner vazio.
pub fn construir_campos<C>(modelos: &RegistroModelos, chave_operacao: &str, conteiner: &mut C)
where
    C: ConstrutorDeCampos + ?Sized,
{
    conteiner.limpar();

    let modelo = modelos.modelo(chave_operacao);
    let mut contadores: HashMap<String, usize> = HashMap::new();

    for especificacao in modelo {
        let id = gerar_identificador(especificacao.rotulo, &mut contadores);
        let descricao = DescricaoControle {
            id: &id,
            rotulo: especificacao.rotulo,
            layout: especificacao.layout,
            // Seleções também recebem o atributo, ainda que sem efeito.
            tamanho_maximo: modelos.tamanho_maximo(especificacao.rotulo),
        };

        let controle = match especificacao.tipo {
            TipoCampo::Selecao(opcoes) => {
                conteiner.criar_selecao(descricao, opcoes_da_selecao(opcoes))
            }
            TipoCampo::Texto => conteiner.criar_texto(descricao, mascara_do_campo(especificacao)),
        };

        conteiner.anexar(controle);
    }

    debug!(
        operacao = chave_operacao,
        campos = modelo.len(),
        "campos dinâmicos reconstruídos"
    );
}

fn opcoes_da_selecao(opcoes: &[&str]) -> Vec<OpcaoSelecao> {
    opcoes
        .iter()
        .enumerate()
        .map(|(i, texto)| OpcaoSelecao {
            texto: texto.to_string(),
            desabilitada: i == 0,
            selecionada: i == 0,
        })
        .collect()
}

fn mascara_do_campo(especificacao: &EspecificacaoCampo) -> Option<Mascara> {
    ROTULOS_PONTO_FIXO
        .contains(&especificacao.rotulo)
        .then_some(Mascara::PontoFixo)
}

// --- Contêiner sem interface gráfica ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipoControle {
    Texto { mascara: Option<Mascara> },
    Selecao { opcoes: Vec<OpcaoSelecao> },
}

/// Um controle instanciado a partir de uma especificação de campo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampoRenderizado {
    pub id: String,
    pub rotulo: String,
    pub layout: String,
    pub tamanho_maximo: Option<usize>,
    pub controle: TipoControle,
    valor: String,
}

impl CampoRenderizado {
    pub fn valor(&self) -> &str {
        &self.valor
    }

    /// Atribuição programática.
    ///
    /// Numa seleção, um valor que não corresponde a nenhuma opção deixa o
    /// controle sem opção escolhida (valor vazio).
    pub fn definir_valor(&mut self, valor: &str) {
        match &mut self.controle {
            TipoControle::Texto { .. } => self.valor = valor.to_string(),
            TipoControle::Selecao { opcoes } => {
                let mut encontrada = false;
                for opcao in opcoes.iter_mut() {
                    opcao.selecionada = !encontrada && opcao.texto == valor;
                    encontrada |= opcao.selecionada;
                }
                self.valor = if encontrada {
                    valor.to_string()
                } else {
                    String::new()
                };
            }
        }
    }

    /// Entrada do usuário: aplica a máscara do campo. Se o valor resultante
    /// passar do tamanho máximo, a edição é recusada e o valor anterior fica.
    pub fn digitar(&mut self, entrada: &str) {
        match self.controle {
            TipoControle::Texto { mascara } => {
                let novo = match mascara {
                    Some(mascara) => mascara.aplicar(entrada),
                    None => entrada.to_string(),
                };
                if self
                    .tamanho_maximo
                    .is_some_and(|max| novo.chars().count() > max)
                {
                    debug!("entrada recusada em {}: {novo:?}", self.id);
                    return;
                }
                self.valor = novo;
            }
            TipoControle::Selecao { .. } => self.definir_valor(entrada),
        }
    }
}

/// Contêiner em memória: guarda os campos na ordem em que foram anexados.
#[derive(Debug, Clone, Default)]
pub struct ConteinerMemoria {
    campos: Vec<CampoRenderizado>,
}

impl ConteinerMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn campos(&self) -> &[CampoRenderizado] {
        &self.campos
    }

    pub fn campo(&self, id: &str) -> Option<&CampoRenderizado> {
        self.campos.iter().find(|c| c.id == id)
    }

    pub fn campo_mut(&mut self, id: &str) -> Option<&mut CampoRenderizado> {
        self.campos.iter_mut().find(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.campos.iter().map(|c| c.id.clone()).collect()
    }

    pub fn valores(&self) -> Vec<String> {
        self.campos.iter().map(|c| c.valor.clone()).collect()
    }

    /// Pares (rótulo, valor) na ordem de exibição.
    pub fn pares_rotulo_valor(&self) -> Vec<(String, String)> {
        self.campos
            .iter()
            .map(|c| (c.rotulo.clone(), c.valor.clone()))
            .collect()
    }

    /// Atribui os valores por posição; campos sem valor correspondente ficam vazios.
    pub fn preencher_por_posicao(&mut self, valores: &[String]) {
        for (i, campo) in self.campos.iter_mut().enumerate() {
            let valor = valores.get(i).map(String::as_str).unwrap_or_default();
            campo.definir_valor(valor);
        }
    }
}

impl ConstrutorDeCampos for ConteinerMemoria {
    type Controle = CampoRenderizado;

    fn limpar(&mut self) {
        self.campos.clear();
    }

    fn criar_texto(
        &mut self,
        descricao: DescricaoControle<'_>,
        mascara: Option<Mascara>,
    ) -> CampoRenderizado {
        CampoRenderizado {
            id: descricao.id.to_string(),
            rotulo: descricao.rotulo.to_string(),
            layout: descricao.layout.to_string(),
            tamanho_maximo: descricao.tamanho_maximo,
            controle: TipoControle::Texto { mascara },
            valor: String::new(),
        }
    }

    fn criar_selecao(
        &mut self,
        descricao: DescricaoControle<'_>,
        opcoes: Vec<OpcaoSelecao>,
    ) -> CampoRenderizado {
        // A opção pré-selecionada (placeholder) é o valor inicial.
        let valor = opcoes
            .iter()
            .find(|o| o.selecionada)
            .map(|o| o.texto.clone())
            .unwrap_or_default();

        CampoRenderizado {
            id: descricao.id.to_string(),
            rotulo: descricao.rotulo.to_string(),
            layout: descricao.layout.to_string(),
            tamanho_maximo: descricao.tamanho_maximo,
            controle: TipoControle::Selecao { opcoes },
            valor,
        }
    }

    fn anexar(&mut self, controle: CampoRenderizado) {
        self.campos.push(controle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Operacao, PLACEHOLDER_SELECAO};

    fn construir(chave: &str) -> ConteinerMemoria {
        let modelos = RegistroModelos::padrao();
        let mut conteiner = ConteinerMemoria::new();
        construir_campos(&modelos, chave, &mut conteiner);
        conteiner
    }

    #[test]
    fn um_controle_por_especificacao_na_ordem_do_modelo() {
        let modelos = RegistroModelos::padrao();
        for op in Operacao::TODAS {
            let conteiner = construir(op.chave());
            let rotulos: Vec<&str> = conteiner.campos().iter().map(|c| c.rotulo.as_str()).collect();
            let esperado: Vec<&str> = modelos.modelo(op.chave()).iter().map(|e| e.rotulo).collect();
            assert_eq!(rotulos, esperado, "operação {op}");
        }
    }

    #[test]
    fn identificadores_do_modelo_margem() {
        let conteiner = construir("margem");
        assert_eq!(
            conteiner.ids(),
            vec![
                "parcela_1",
                "cdigo_da_tabela_1",
                "prazo_1",
                "seguro_a_ser_adicionado_1"
            ]
        );
    }

    #[test]
    fn identificadores_da_portabilidade_removem_simbolos() {
        let conteiner = construir("portabilidade");
        assert!(conteiner.campo("n_do_contrato_1").is_some());
        assert!(conteiner.campo("cdigo_do_banco_origem_1").is_some());
        assert!(conteiner.campo("saldo_devedor_1").is_some());
    }

    #[test]
    fn rotulos_repetidos_recebem_contador() {
        let mut contadores = HashMap::new();
        assert_eq!(gerar_identificador("Parcela", &mut contadores), "parcela_1");
        assert_eq!(gerar_identificador("Parcela", &mut contadores), "parcela_2");
        assert_eq!(gerar_identificador("Prazo  Total", &mut contadores), "prazo_total_1");
    }

    #[test]
    fn reconstrucao_e_deterministica() {
        let primeira = construir("portabilidade");
        let segunda = construir("portabilidade");
        assert_eq!(primeira.ids(), segunda.ids());
    }

    #[test]
    fn reconstrucao_descarta_campos_anteriores() {
        let modelos = RegistroModelos::padrao();
        let mut conteiner = ConteinerMemoria::new();
        construir_campos(&modelos, "portabilidade", &mut conteiner);
        construir_campos(&modelos, "cartao", &mut conteiner);
        assert_eq!(conteiner.campos().len(), 5);

        construir_campos(&modelos, "desconhecida", &mut conteiner);
        assert!(conteiner.campos().is_empty());
    }

    #[test]
    fn selecao_tem_placeholder_desabilitado_e_preselecionado() {
        let conteiner = construir("cartao");
        let campo = conteiner.campo("tipo_do_carto_1").unwrap();
        let TipoControle::Selecao { opcoes } = &campo.controle else {
            panic!("esperava seleção");
        };
        assert_eq!(opcoes.len(), 3);
        assert!(opcoes[0].desabilitada && opcoes[0].selecionada);
        assert!(opcoes[1..].iter().all(|o| !o.desabilitada && !o.selecionada));
        assert_eq!(campo.valor(), PLACEHOLDER_SELECAO);
    }

    #[test]
    fn mascara_somente_em_parcela_e_saldo_devedor() {
        let conteiner = construir("portabilidade");
        let com_mascara: Vec<&str> = conteiner
            .campos()
            .iter()
            .filter(|c| {
                matches!(
                    c.controle,
                    TipoControle::Texto {
                        mascara: Some(Mascara::PontoFixo)
                    }
                )
            })
            .map(|c| c.rotulo.as_str())
            .collect();
        assert_eq!(com_mascara, vec!["Parcela", "Saldo Devedor"]);
    }

    #[test]
    fn digitar_aplica_limite_e_mascara() {
        let mut conteiner = construir("margem");
        let parcela = conteiner.campo_mut("parcela_1").unwrap();
        parcela.digitar("35000");
        assert_eq!(parcela.valor(), "350.00");

        // Limite de 7 caracteres sobre o valor já mascarado.
        parcela.digitar("123456");
        assert_eq!(parcela.valor(), "1234.56");
        parcela.digitar("1234567");
        assert_eq!(parcela.valor(), "1234.56");

        let prazo = conteiner.campo_mut("prazo_1").unwrap();
        prazo.digitar("12");
        assert_eq!(prazo.valor(), "12");
        prazo.digitar("12345");
        assert_eq!(prazo.valor(), "12");
    }

    #[test]
    fn campo_cheio_recusa_mais_um_digito() {
        let mut conteiner = construir("margem");
        let parcela = conteiner.campo_mut("parcela_1").unwrap();
        parcela.digitar("123456");
        assert_eq!(parcela.valor(), "1234.56");

        parcela.digitar("1234.567");
        assert_eq!(parcela.valor(), "1234.56");
        assert!(parcela.valor().chars().count() <= parcela.tamanho_maximo.unwrap());
    }

    #[test]
    fn saldo_devedor_respeita_limite_apos_mascara() {
        let mut conteiner = construir("portabilidade");
        let saldo = conteiner.campo_mut("saldo_devedor_1").unwrap();
        let max = saldo.tamanho_maximo.unwrap();

        saldo.digitar(&"9".repeat(max));
        assert_eq!(saldo.valor(), "");
        saldo.digitar(&"9".repeat(max - 1));
        assert_eq!(saldo.valor().chars().count(), max);
    }

    #[test]
    fn selecao_rejeita_valor_fora_das_opcoes() {
        let mut conteiner = construir("cartao");
        let saque = conteiner.campo_mut("deseja_saque_1").unwrap();
        saque.definir_valor("Sim");
        assert_eq!(saque.valor(), "Sim");
        saque.definir_valor("Talvez");
        assert_eq!(saque.valor(), "");
    }

    #[test]
    fn preencher_por_posicao_completa_com_vazio() {
        let mut conteiner = construir("margem");
        conteiner.preencher_por_posicao(&["100.00".to_string(), "COD1".to_string()]);
        assert_eq!(conteiner.valores(), vec!["100.00", "COD1", "", ""]);
    }
}
