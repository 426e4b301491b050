use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    solowork::cli::run().await
}
