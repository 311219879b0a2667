//! Formulário de proposta sem interface gráfica.
//!
//! Reúne os campos fixos (dados pessoais, convênio, endereço, dados bancários),
//! o seletor de operação e o contêiner de campos dinâmicos, com as mesmas
//! reações da página: troca de operação, digitação, coleta, preenchimento a
//! partir de um registro, carregamento por CPF e envio.

use tracing::{debug, info, warn};

use crate::{
    Armazenamento, CAMPO_CPF, CAMPO_TIPO_OPERACAO, ConteinerMemoria, Documento, Gravacao, Logo,
    PLACEHOLDER_SELECAO, PropostaError, PropostaResult, Registro, RegistroModelos, Repositorio,
    construir_campos, cpf_normalizado, formatar_cpf, validar_obrigatorios,
};

/// Atributos que podem identificar um controle no registro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Atributos {
    pub id: Option<String>,
    pub nome: Option<String>,
    pub placeholder: Option<String>,
    pub classe: String,
}

impl Atributos {
    pub fn com_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// Chave no registro: id, senão nome, senão placeholder, senão classe.
    pub fn chave(&self) -> &str {
        [&self.id, &self.nome, &self.placeholder]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or(self.classe.as_str())
    }

    fn corresponde(&self, chave: &str) -> bool {
        self.id.as_deref() == Some(chave) || self.nome.as_deref() == Some(chave)
    }
}

/// Campo sempre presente no formulário.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampoFixo {
    pub atributos: Atributos,
    pub rotulo: String,
    pub obrigatorio: bool,
    pub valor: String,
    /// Marcado na última validação como vazio ou no placeholder.
    pub invalido: bool,
}

impl CampoFixo {
    pub fn new(atributos: Atributos, rotulo: &str, obrigatorio: bool, inicial: &str) -> Self {
        Self {
            atributos,
            rotulo: rotulo.to_string(),
            obrigatorio,
            valor: inicial.to_string(),
            invalido: false,
        }
    }
}

/// (id, rótulo, obrigatório, valor inicial)
const CAMPOS_FIXOS: &[(&str, &str, bool, &str)] = &[
    ("id-cpf", "CPF", true, ""),
    ("id-nome", "Nome", true, ""),
    ("id-nascimento", "Nascimento", true, ""),
    ("id-rg", "RG", false, ""),
    ("id-uf-rg", "UF do RG", false, ""),
    ("id-emissao", "Emissão", false, ""),
    ("id-mae", "Mãe", true, ""),
    ("id-pai", "Pai", false, ""),
    ("id-naturalidade", "Naturalidade", false, ""),
    ("id-uf-naturalidade", "UF Naturalidade", false, ""),
    ("id-celular", "Celular", true, ""),
    ("id-email", "E-mail", false, ""),
    ("id-orgao", "Orgão", false, ""),
    ("id-especie", "Espécie/Secretaria", false, ""),
    ("id-matricula", "Matrícula", false, ""),
    ("id-cep", "CEP", false, ""),
    ("id-endereco", "Endereço", false, ""),
    ("id-numero-endereco", "Número", false, ""),
    ("id-complemento-endereco", "Complemento", false, ""),
    ("id-bairro", "Bairro", false, ""),
    ("id-cidade", "Cidade", false, ""),
    ("uf-endereco", "UF", false, ""),
    ("banco", "Banco", true, ""),
    ("agencia", "Agência", true, ""),
    ("conta", "Conta", true, ""),
    ("tipo-conta", "Tipo de Conta", true, PLACEHOLDER_SELECAO),
    ("dv", "Dígito", false, ""),
    (CAMPO_TIPO_OPERACAO, "Tipo de Operação", true, PLACEHOLDER_SELECAO),
    ("id-observacoes", "Observações", false, ""),
];

pub fn campos_fixos_padrao() -> Vec<CampoFixo> {
    CAMPOS_FIXOS
        .iter()
        .map(|&(id, rotulo, obrigatorio, inicial)| {
            CampoFixo::new(Atributos::com_id(id), rotulo, obrigatorio, inicial)
        })
        .collect()
}

/// Resultado de um envio bem-sucedido.
#[derive(Debug, Clone)]
pub struct Envio {
    pub registro: Registro,
    pub gravacao: Gravacao,
    pub documento: Documento,
}

pub struct Formulario<'m> {
    modelos: &'m RegistroModelos,
    fixos: Vec<CampoFixo>,
    dinamicos: ConteinerMemoria,
    foco: Option<String>,
}

impl<'m> Formulario<'m> {
    pub fn new(modelos: &'m RegistroModelos) -> Self {
        Self::com_campos_fixos(modelos, campos_fixos_padrao())
    }

    pub fn com_campos_fixos(modelos: &'m RegistroModelos, fixos: Vec<CampoFixo>) -> Self {
        Self {
            modelos,
            fixos,
            dinamicos: ConteinerMemoria::new(),
            foco: None,
        }
    }

    pub fn campos_fixos(&self) -> &[CampoFixo] {
        &self.fixos
    }

    pub fn dinamicos(&self) -> &ConteinerMemoria {
        &self.dinamicos
    }

    /// Campo que recebeu o foco na última validação malsucedida.
    pub fn foco(&self) -> Option<&str> {
        self.foco.as_deref()
    }

    /// Valor de um campo fixo (por id ou nome) ou dinâmico (por id).
    pub fn valor(&self, chave: &str) -> Option<&str> {
        self.fixo(chave)
            .map(|c| c.valor.as_str())
            .or_else(|| self.dinamicos.campo(chave).map(|c| c.valor()))
    }

    fn fixo(&self, chave: &str) -> Option<&CampoFixo> {
        self.fixos.iter().find(|c| c.atributos.corresponde(chave))
    }

    fn fixo_mut(&mut self, chave: &str) -> Option<&mut CampoFixo> {
        self.fixos.iter_mut().find(|c| c.atributos.corresponde(chave))
    }

    /// Atribuição programática. Devolve `false` se nenhum controle corresponde.
    pub fn definir(&mut self, chave: &str, valor: &str) -> bool {
        if let Some(campo) = self.fixo_mut(chave) {
            campo.valor = valor.to_string();
            return true;
        }
        match self.dinamicos.campo_mut(chave) {
            Some(campo) => {
                campo.definir_valor(valor);
                true
            }
            None => false,
        }
    }

    /// Entrada do usuário. Nos campos dinâmicos aplica tamanho máximo e máscara;
    /// no seletor de operação, reconstrói os campos dinâmicos.
    pub fn digitar(&mut self, chave: &str, entrada: &str) -> bool {
        if chave == CAMPO_TIPO_OPERACAO {
            self.selecionar_operacao(entrada);
            return true;
        }
        match self.dinamicos.campo_mut(chave) {
            Some(campo) => {
                campo.digitar(entrada);
                true
            }
            None => self.definir(chave, entrada),
        }
    }

    /// Troca de operação: o seletor assume a chave e os campos dinâmicos são
    /// refeitos do zero, descartando os valores anteriores.
    pub fn selecionar_operacao(&mut self, chave_operacao: &str) {
        if let Some(seletor) = self.fixo_mut(CAMPO_TIPO_OPERACAO) {
            seletor.valor = chave_operacao.to_string();
        }
        construir_campos(self.modelos, chave_operacao, &mut self.dinamicos);
    }

    /// Retrato plano de todos os valores do formulário.
    pub fn coletar(&self) -> Registro {
        let mut registro = Registro::new();

        for campo in &self.fixos {
            registro.inserir(campo.atributos.chave(), campo.valor.trim());
        }
        for campo in self.dinamicos.campos() {
            registro.inserir(campo.id.as_str(), campo.valor().trim());
        }

        registro.campos_operacao = self.dinamicos.valores();
        registro.ids_campos_operacao = self.dinamicos.ids();
        registro
    }

    /// Preenche o formulário com um registro. Sem registro, nada muda.
    ///
    /// Chaves sem controle correspondente são ignoradas. Com tipo de operação,
    /// os campos dinâmicos são reconstruídos e preenchidos por posição.
    pub fn preencher(&mut self, registro: Option<&Registro>) {
        let Some(registro) = registro else {
            return;
        };

        for (chave, valor) in registro.pares() {
            self.definir(chave, &valor);
        }

        let Some(operacao) = registro.tipo_operacao() else {
            return;
        };

        self.selecionar_operacao(&operacao);

        if !registro.campos_operacao.is_empty() {
            self.conferir_alinhamento(registro);
            self.dinamicos.preencher_por_posicao(&registro.campos_operacao);
        } else {
            let legados = registro.valores_dinamicos_legados();
            if !legados.is_empty() {
                self.dinamicos.preencher_por_posicao(&legados);
            }
        }
    }

    /// O preenchimento é posicional; se o registro trouxer os identificadores
    /// da coleta e eles divergirem dos atuais, o modelo mudou desde a gravação.
    fn conferir_alinhamento(&self, registro: &Registro) {
        if registro.ids_campos_operacao.is_empty() {
            return;
        }
        let atuais = self.dinamicos.ids();
        if registro.ids_campos_operacao != atuais {
            warn!(
                gravados = ?registro.ids_campos_operacao,
                atuais = ?atuais,
                "campos dinâmicos desalinhados; preenchendo por posição"
            );
        }
    }

    /// Com 11 dígitos no CPF, carrega o cliente gravado e reescreve o CPF
    /// formatado. Devolve `true` se um registro foi carregado.
    pub fn carregar_por_cpf<A: Armazenamento>(
        &mut self,
        repositorio: &Repositorio<A>,
        cpf_digitado: &str,
    ) -> bool {
        self.definir(CAMPO_CPF, cpf_digitado);

        let Some(cpf) = cpf_normalizado(cpf_digitado) else {
            return false;
        };

        match repositorio.recuperar(&cpf) {
            Some(registro) => {
                self.preencher(Some(&registro));
                self.definir(CAMPO_CPF, &formatar_cpf(&cpf));
                debug!(cpf = %cpf, "cliente carregado");
                true
            }
            None => false,
        }
    }

    /// Marca os obrigatórios vazios ou no placeholder e devolve seus ids.
    pub fn validar(&mut self) -> Vec<String> {
        let invalidos = validar_obrigatorios(
            self.fixos
                .iter()
                .filter(|c| c.obrigatorio)
                .map(|c| (c.atributos.chave(), c.valor.as_str())),
        );

        for campo in &mut self.fixos {
            campo.invalido = invalidos.iter().any(|id| id == campo.atributos.chave());
        }
        self.foco = invalidos.first().cloned();

        invalidos
    }

    /// Valida, coleta, grava e monta o documento do envio.
    ///
    /// Com obrigatórios pendentes, nada é gravado e o primeiro campo inválido
    /// fica em foco.
    pub fn submeter<A: Armazenamento>(
        &mut self,
        repositorio: &mut Repositorio<A>,
        logo: Option<&Logo>,
    ) -> PropostaResult<Envio> {
        let invalidos = self.validar();
        if !invalidos.is_empty() {
            return Err(PropostaError::CamposObrigatorios { campos: invalidos });
        }

        let registro = self.coletar();
        let gravacao = repositorio.salvar(&registro)?;
        let documento = Documento::montar(&registro, &self.dinamicos.pares_rotulo_valor(), logo);

        info!(documento = %documento.nome_base, "formulário validado");

        Ok(Envio {
            registro,
            gravacao,
            documento,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArmazenamentoMemoria, Consulta};

    fn preencher_obrigatorios(formulario: &mut Formulario<'_>) {
        for (chave, valor) in [
            ("id-cpf", "123.456.789-00"),
            ("id-nome", "João da Silva"),
            ("id-nascimento", "15/06/1986"),
            ("id-mae", "Maria das Dores"),
            ("id-celular", "(11)91234-5678"),
            ("banco", "001 - Banco do Brasil"),
            ("agencia", "1234"),
            ("conta", "67890-1"),
            ("tipo-conta", "C/C"),
        ] {
            assert!(formulario.definir(chave, valor), "campo {chave}");
        }
    }

    #[test]
    fn chave_do_controle_segue_a_ordem_de_fallback() {
        let mut atributos = Atributos {
            classe: "form-control".into(),
            ..Atributos::default()
        };
        assert_eq!(atributos.chave(), "form-control");
        atributos.placeholder = Some("Digite".into());
        assert_eq!(atributos.chave(), "Digite");
        atributos.nome = Some("nome".into());
        assert_eq!(atributos.chave(), "nome");
        atributos.id = Some("id-nome".into());
        assert_eq!(atributos.chave(), "id-nome");
    }

    #[test]
    fn preencher_margem_por_posicao() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);

        let mut registro = Registro::new();
        registro.inserir(CAMPO_TIPO_OPERACAO, "margem");
        registro.campos_operacao = ["100.00", "COD1", "12", "Não"]
            .map(String::from)
            .to_vec();

        formulario.preencher(Some(&registro));

        assert_eq!(formulario.valor(CAMPO_TIPO_OPERACAO), Some("margem"));
        assert_eq!(
            formulario.dinamicos().valores(),
            vec!["100.00", "COD1", "12", "Não"]
        );
    }

    #[test]
    fn preencher_sem_registro_nao_altera_nada() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);
        formulario.selecionar_operacao("cartao");
        formulario.definir("id-nome", "Ana");
        let antes = formulario.coletar();

        formulario.preencher(None);
        assert_eq!(formulario.coletar(), antes);
    }

    #[test]
    fn preencher_com_chaves_legadas() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);

        let mut registro = Registro::new();
        registro.inserir("id-nome", "Ana");
        registro.inserir(CAMPO_TIPO_OPERACAO, "refin");
        registro.inserir("op_parcela", "250.00");
        registro.inserir("chave-sem-controle", "ignorada");
        registro.inserir("campo_tabela", "T9");

        formulario.preencher(Some(&registro));

        assert_eq!(formulario.valor("id-nome"), Some("Ana"));
        assert_eq!(formulario.valor("chave-sem-controle"), None);
        assert_eq!(
            formulario.dinamicos().valores(),
            vec!["250.00", "T9", "", ""]
        );
    }

    #[test]
    fn troca_de_operacao_descarta_valores() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);
        formulario.digitar(CAMPO_TIPO_OPERACAO, "margem");
        formulario.digitar("parcela_1", "35000");
        assert_eq!(formulario.valor("parcela_1"), Some("350.00"));

        formulario.digitar(CAMPO_TIPO_OPERACAO, "refin");
        assert_eq!(formulario.valor("parcela_1"), Some(""));
    }

    #[test]
    fn coletar_inclui_campos_dinamicos() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);
        formulario.selecionar_operacao("cartao");
        formulario.definir("id-nome", "  Ana  ");
        formulario.digitar("parcela_1", "9900");

        let registro = formulario.coletar();
        assert_eq!(registro.valor("id-nome").as_deref(), Some("Ana"));
        assert_eq!(registro.valor("parcela_1").as_deref(), Some("99.00"));
        assert_eq!(registro.tipo_operacao().as_deref(), Some("cartao"));
        assert_eq!(
            registro.campos_operacao,
            vec!["99.00", "", "", PLACEHOLDER_SELECAO, PLACEHOLDER_SELECAO]
        );
        assert_eq!(registro.ids_campos_operacao, formulario.dinamicos().ids());
    }

    #[test]
    fn submeter_com_pendencias_nao_grava() {
        let modelos = RegistroModelos::padrao();
        let mut formulario = Formulario::new(&modelos);
        let mut repositorio = Repositorio::new(ArmazenamentoMemoria::new());

        formulario.definir("id-nome", "Ana");
        let erro = formulario.submeter(&mut repositorio, None).unwrap_err();

        let PropostaError::CamposObrigatorios { campos } = erro else {
            panic!("erro inesperado: {erro}");
        };
        assert_eq!(campos.first().map(String::as_str), Some("id-cpf"));
        assert!(campos.iter().any(|c| c == "tipo-conta"));
        assert!(campos.iter().any(|c| c == CAMPO_TIPO_OPERACAO));
        assert!(!campos.iter().any(|c| c == "id-nome"));
        assert_eq!(formulario.foco(), Some("id-cpf"));
        assert!(repositorio.armazenamento().is_empty());
    }

    #[test]
    fn submeter_e_carregar_pelo_cpf() {
        let modelos = RegistroModelos::padrao();
        let mut repositorio = Repositorio::new(ArmazenamentoMemoria::new());

        let mut formulario = Formulario::new(&modelos);
        preencher_obrigatorios(&mut formulario);
        formulario.digitar(CAMPO_TIPO_OPERACAO, "margem");
        formulario.digitar("parcela_1", "35000");
        formulario.digitar("prazo_1", "84");

        let envio = formulario.submeter(&mut repositorio, None).unwrap();
        assert_eq!(envio.gravacao, Gravacao::PorCpf("12345678900".into()));
        assert_eq!(envio.documento.nome_base, "João da Silva - margem");
        assert!(matches!(
            repositorio.ultimo_envio().unwrap(),
            Consulta::Encontrado(_)
        ));

        let mut outro = Formulario::new(&modelos);
        assert!(outro.carregar_por_cpf(&repositorio, "12345678900"));
        assert_eq!(outro.valor("id-cpf"), Some("123.456.789-00"));
        assert_eq!(outro.valor("id-nome"), Some("João da Silva"));
        assert_eq!(outro.valor("parcela_1"), Some("350.00"));
        assert_eq!(outro.valor("prazo_1"), Some("84"));
    }

    #[test]
    fn carregar_por_cpf_incompleto_nao_consulta() {
        let modelos = RegistroModelos::padrao();
        let repositorio = Repositorio::new(ArmazenamentoMemoria::new());
        let mut formulario = Formulario::new(&modelos);

        assert!(!formulario.carregar_por_cpf(&repositorio, "123.456"));
        assert_eq!(formulario.valor("id-cpf"), Some("123.456"));
        assert!(!formulario.carregar_por_cpf(&repositorio, "12345678900"));
    }
}
