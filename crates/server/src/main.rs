#[tokio::main]
async fn main() -> anyhow::Result<()> {
    askdoc_server::start().await
}
