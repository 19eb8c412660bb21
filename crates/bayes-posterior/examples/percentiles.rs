//! Solve posterior percentiles for a prior and likelihood given as JSON
//!
//! ```text
//! RUST_LOG=bayes_posterior=debug cargo run --example percentiles -- \
//!     '{"family":"beta","alpha":2.0,"beta":5.0}' \
//!     '{"family":"normal","location":0.35,"scale":0.1}' 0.05 0.5 0.95
//! ```

use anyhow::{Context, Result};
use bayes_core::FamilySpec;
use bayes_posterior::{Posterior, DEFAULT_PERCENTILES};
use tracing_subscriber::EnvFilter;

const DEFAULT_PRIOR: &str = r#"{"family":"beta","alpha":2.0,"beta":5.0}"#;
const DEFAULT_LIKELIHOOD: &str = r#"{"family":"normal","location":0.35,"scale":0.1}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let prior_json = args.first().map_or(DEFAULT_PRIOR, String::as_str);
    let likelihood_json = args.get(1).map_or(DEFAULT_LIKELIHOOD, String::as_str);
    let quantiles = if args.len() > 2 {
        args[2..]
            .iter()
            .map(|s| s.parse::<f64>().with_context(|| format!("bad quantile '{s}'")))
            .collect::<Result<Vec<_>>>()?
    } else {
        DEFAULT_PERCENTILES.to_vec()
    };

    let prior: FamilySpec = serde_json::from_str(prior_json).context("parsing prior")?;
    let likelihood: FamilySpec =
        serde_json::from_str(likelihood_json).context("parsing likelihood")?;
    let prior = prior.build()?;
    let likelihood = likelihood.build()?;

    let posterior = Posterior::new(&prior, &likelihood)?;
    println!(
        "Posterior of {} prior and {} likelihood on {}",
        prior.name(),
        likelihood.name(),
        posterior.support()
    );
    println!("  mean: {:.6}", posterior.expectation()?);

    let report = posterior.solve_many(&quantiles)?;
    for (q, outcome) in report.iter() {
        match outcome {
            Ok(x) => println!("  p{:<6} {:.6}", q * 100.0, x),
            Err(e) => println!("  p{:<6} failed: {}", q * 100.0, e),
        }
    }
    println!("Solved in {:?}", report.elapsed());

    let stats = posterior.cache_stats();
    println!(
        "CDF cache: {} entries, {} hits, {} extensions, {} cold, {} saturated",
        stats.entries, stats.hits, stats.extensions, stats.cold, stats.saturated
    );
    Ok(())
}
