#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reunion_server::run().await
}
