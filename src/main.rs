#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crypto_tracker_lib::run().await?;
    Ok(())
}
