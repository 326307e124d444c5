#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = submission_reaper::run_worker().await {
        eprintln!("reaper-worker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
