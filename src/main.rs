#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = submission_reaper::run().await {
        eprintln!("submission-reaper fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
