mod args;
mod armazenamento;
mod construtor;
mod documento;
mod error;
mod formulario;
pub mod logging;
mod mascara;
mod modelos;
mod regex;
mod registro;
mod relatorio;
mod repositorio;
mod validacao;

pub use self::{
    args::*, armazenamento::*, construtor::*, documento::*, error::*, formulario::*, mascara::*,
    modelos::*, regex::*, registro::*, relatorio::*, repositorio::*, validacao::*,
};
