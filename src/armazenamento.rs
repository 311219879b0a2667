use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{PropostaError, PropostaResult};

/// Meio de armazenamento chave/valor (texto), local a um único usuário.
pub trait Armazenamento {
    fn ler(&self, chave: &str) -> PropostaResult<Option<String>>;
    fn gravar(&mut self, chave: &str, valor: &str) -> PropostaResult<()>;
}

/// Armazenamento volátil em memória.
#[derive(Debug, Clone, Default)]
pub struct ArmazenamentoMemoria {
    entradas: HashMap<String, String>,
}

impl ArmazenamentoMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entradas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entradas.is_empty()
    }

    pub fn contem(&self, chave: &str) -> bool {
        self.entradas.contains_key(chave)
    }
}

impl Armazenamento for ArmazenamentoMemoria {
    fn ler(&self, chave: &str) -> PropostaResult<Option<String>> {
        Ok(self.entradas.get(chave).cloned())
    }

    fn gravar(&mut self, chave: &str, valor: &str) -> PropostaResult<()> {
        self.entradas.insert(chave.to_string(), valor.to_string());
        Ok(())
    }
}

/// Armazenamento persistente: um arquivo `<chave>.json` por entrada.
#[derive(Debug, Clone)]
pub struct ArmazenamentoArquivo {
    diretorio: PathBuf,
}

impl ArmazenamentoArquivo {
    /// O diretório é criado na primeira gravação.
    pub fn new(diretorio: impl Into<PathBuf>) -> Self {
        Self {
            diretorio: diretorio.into(),
        }
    }

    pub fn diretorio(&self) -> &Path {
        &self.diretorio
    }

    fn caminho(&self, chave: &str) -> PathBuf {
        self.diretorio.join(format!("{chave}.json"))
    }
}

impl Armazenamento for ArmazenamentoArquivo {
    fn ler(&self, chave: &str) -> PropostaResult<Option<String>> {
        let caminho = self.caminho(chave);
        match fs::read_to_string(&caminho) {
            Ok(conteudo) => Ok(Some(conteudo)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PropostaError::io_em(e, caminho)),
        }
    }

    fn gravar(&mut self, chave: &str, valor: &str) -> PropostaResult<()> {
        fs::create_dir_all(&self.diretorio)
            .map_err(|e| PropostaError::io_em(e, &self.diretorio))?;

        // Grava num temporário e renomeia: leitores nunca veem um arquivo pela metade.
        let caminho = self.caminho(chave);
        let temporario = caminho.with_extension("json.tmp");
        fs::write(&temporario, valor).map_err(|e| PropostaError::io_em(e, &temporario))?;
        fs::rename(&temporario, &caminho).map_err(|e| PropostaError::io_em(e, &caminho))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memoria_sobrescreve_entrada() {
        let mut armazenamento = ArmazenamentoMemoria::new();
        assert_eq!(armazenamento.ler("a").unwrap(), None);
        armazenamento.gravar("a", "1").unwrap();
        armazenamento.gravar("a", "2").unwrap();
        assert_eq!(armazenamento.ler("a").unwrap().as_deref(), Some("2"));
        assert_eq!(armazenamento.len(), 1);
    }

    #[test]
    fn arquivo_cria_diretorio_e_persiste() {
        let temp_dir = TempDir::new().unwrap();
        let diretorio = temp_dir.path().join("propostas");

        let mut armazenamento = ArmazenamentoArquivo::new(&diretorio);
        assert_eq!(armazenamento.ler("cliente_12345678900").unwrap(), None);

        armazenamento
            .gravar("cliente_12345678900", r#"{"id-cpf":"12345678900"}"#)
            .unwrap();
        assert!(diretorio.join("cliente_12345678900.json").is_file());
        assert!(!diretorio.join("cliente_12345678900.json.tmp").exists());

        // Nova instância sobre o mesmo diretório enxerga o conteúdo.
        let outra = ArmazenamentoArquivo::new(&diretorio);
        assert_eq!(
            outra.ler("cliente_12345678900").unwrap().as_deref(),
            Some(r#"{"id-cpf":"12345678900"}"#)
        );
    }
}
