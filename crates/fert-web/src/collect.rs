use fert_core::errors::FertError;
use fert_source::{fetch_all_tokens, FetchOutcome, PaginationOpts, ProgressSource, TokenPages};
use tracing::info;

/// Everything read from upstream for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteData {
    pub progress: u64,
    pub fetch: FetchOutcome,
}

/// Reads the global progress, then every token page.
pub fn collect_site_data<G, P>(
    progress: &G,
    pages: &P,
    opts: &PaginationOpts,
) -> Result<SiteData, FertError>
where
    G: ProgressSource + ?Sized,
    P: TokenPages + ?Sized,
{
    let global = progress.global_progress()?;
    info!(progress = global, "global progress");
    let fetch = fetch_all_tokens(pages, opts)?;
    Ok(SiteData {
        progress: global,
        fetch,
    })
}
