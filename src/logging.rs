use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Inicializa os diagnósticos em stderr.
///
/// `RUST_LOG` tem precedência; sem ele, o nível é `warn` (ou `debug` com `--verbose`).
pub fn init(verbose: bool) {
    let padrao = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(padrao));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // Já pode haver um subscriber instalado (testes de integração, por exemplo).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}
