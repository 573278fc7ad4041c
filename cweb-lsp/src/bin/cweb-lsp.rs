use cweb_config::Loader;
use cweb_lsp::CwebLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Loader::new().with_optional_file("cweb.toml").build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            std::process::exit(1);
        }
    };

    // stdout carries JSON-RPC, so logs must stay on stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = stdin();
    let stdout = stdout();
    let lsp_config = config.lsp;
    let (service, socket) = LspService::new(move |client| CwebLanguageServer::new(client, lsp_config));
    Server::new(stdin, stdout, socket).serve(service).await;
}
