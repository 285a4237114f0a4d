/*
 * Responsibility
 * - tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    id_token_gateway::app::run().await
}
