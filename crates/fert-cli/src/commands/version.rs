use std::error::Error;

use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit JSON with crate versions and build defaults.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    beanstalk_address: &'static str,
    base_url: &'static str,
    default_page_size: usize,
    default_max_requests: usize,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        beanstalk_address: fert_core::config::DEFAULT_BEANSTALK_ADDRESS,
        base_url: fert_core::config::DEFAULT_BASE_URL,
        default_page_size: fert_core::config::DEFAULT_PAGE_SIZE,
        default_max_requests: fert_core::config::DEFAULT_MAX_REQUESTS,
    };
    let json = fert_web::serde::to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
