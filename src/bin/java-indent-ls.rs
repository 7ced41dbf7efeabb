use anyhow::Result;
use java_indent::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    serve().await
}
