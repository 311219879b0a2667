use crate::PLACEHOLDER_SELECAO;

/// Identificadores dos campos obrigatórios vazios ou deixados no placeholder,
/// na ordem recebida. O primeiro é o campo a receber o foco.
pub fn validar_obrigatorios<'a, I>(campos: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    campos
        .into_iter()
        .filter(|(_, valor)| valor.trim().is_empty() || *valor == PLACEHOLDER_SELECAO)
        .map(|(id, _)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aponta_vazios_e_placeholders() {
        let campos = [
            ("id-cpf", "123.456.789-00"),
            ("id-nome", "   "),
            ("tipo-conta", "Selecione..."),
            ("banco", "001"),
            ("conta", ""),
        ];
        assert_eq!(
            validar_obrigatorios(campos),
            vec!["id-nome", "tipo-conta", "conta"]
        );
    }

    #[test]
    fn tudo_preenchido() {
        assert!(validar_obrigatorios([("id-nome", "Maria")]).is_empty());
    }
}
