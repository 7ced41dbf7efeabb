use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::config::ServerConfig;
use crate::lsp::backend::Backend;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = ServerConfig::from_args_and_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
    log::info!("starting java-indent-ls");

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.options.clone())).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
