#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scrollscrape::cli::run().await
}
