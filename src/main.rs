//! Vecflow CLI: reranks a candidate list read from stdin.
//!
//! Input: `{"query": "...", "items": [ScoredItem...], "max_results": 10}` (`max_results` optional).
//! Output: the fused (or fallback) list as JSON on stdout. Logs go to stderr.

use mimalloc::MiMalloc;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use vecflow::config::Config;
use vecflow::rerank::{RerankFusion, ScoredItem};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Deserialize)]
struct RerankInput {
    query: String,
    items: Vec<ScoredItem>,
    #[serde(default)]
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;
    let input: RerankInput = serde_json::from_str(&raw)?;

    tracing::info!(
        items = input.items.len(),
        enabled = config.rerank.enabled,
        top_n = config.rerank.top_n,
        "Vecflow rerank starting"
    );

    let fusion = RerankFusion::new(config.rerank)?;
    let (ranked, outcome) = fusion.rerank_detailed(&input.query, input.items).await;
    tracing::info!(outcome = ?outcome, "Rerank finished");

    let max_results = input.max_results.unwrap_or(ranked.len());
    let limited = fusion.limit_results(ranked, max_results);

    println!("{}", serde_json::to_string_pretty(&limited)?);
    Ok(())
}
