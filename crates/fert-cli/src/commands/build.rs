use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use fert_core::RunConfig;
use fert_source::{HttpGraphqlClient, RpcProgressSource, SubgraphTokenPages};
use fert_web::{build_site, BuildOptions, DirSink};
use tracing::info;

use super::print_summary;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Dotenv file read before the environment; defaults to `./.env` when present.
    #[arg(long)]
    pub env_file: Option<PathBuf>,
    /// Output directory, overriding FERT_OUT_DIR.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Fail on the first rejected token instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

pub fn load_config(args: &BuildArgs) -> Result<RunConfig, Box<dyn Error>> {
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }
    let mut config = RunConfig::from_env()?;
    if let Some(out) = &args.out {
        config.output.dir = out.clone();
    }
    config.strict |= args.strict;
    Ok(config)
}

pub fn run(args: &BuildArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    info!(
        subgraph = %config.source.subgraph_url,
        chain_id = config.source.chain_id,
        out = %config.output.dir.display(),
        "starting build"
    );
    let pages = SubgraphTokenPages::new(HttpGraphqlClient::new(config.source.subgraph_url.clone()));
    let progress = RpcProgressSource::new(&config.source);
    let sink = DirSink::create(&config.output.dir)?;
    let opts = BuildOptions::from(&config);
    let manifest = build_site(&progress, &pages, &sink, &opts, Utc::now())?;
    print_summary(&manifest, &config.output.dir.display().to_string());
    Ok(())
}
