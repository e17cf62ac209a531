use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use fert_core::{HumidityScale, OutputConfig, OutputIdEncoding};
use fert_source::{PaginationOpts, Snapshot, SnapshotSource};
use fert_web::{build_site, BuildOptions, DirSink, MemorySink};

use super::print_summary;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON snapshot `{progress, tokens}` standing in for both sources.
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Output directory for the generated artifacts.
    #[arg(long, required_unless_present = "dry_run")]
    pub out: Option<PathBuf>,
    /// Hex ids, bare metadata copies and no pages.
    #[arg(long)]
    pub metadata_only: bool,
    /// Output id encoding (`decimal` or `hex`).
    #[arg(long)]
    pub id_encoding: Option<String>,
    /// Humidity scaling (`percent` or `raw`).
    #[arg(long)]
    pub humidity_scale: Option<String>,
    /// Base URL prefixed to image and page links.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Records per snapshot page.
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Unix timestamp used instead of the current time.
    #[arg(long)]
    pub timestamp: Option<i64>,
    /// Fail on the first rejected token instead of skipping it.
    #[arg(long)]
    pub strict: bool,
    /// Render in memory and report what would be written.
    #[arg(long)]
    pub dry_run: bool,
}

fn output_config(args: &RenderArgs) -> Result<OutputConfig, Box<dyn Error>> {
    let dir = args.out.clone().unwrap_or_default();
    let mut output = if args.metadata_only {
        OutputConfig::metadata_only(dir)
    } else {
        OutputConfig::new(dir)
    };
    if let Some(encoding) = &args.id_encoding {
        output.id_encoding = encoding.parse::<OutputIdEncoding>()?;
    }
    if let Some(scale) = &args.humidity_scale {
        output.humidity_scale = scale.parse::<HumidityScale>()?;
    }
    if let Some(base_url) = &args.base_url {
        output.base_url = base_url.trim_end_matches('/').to_string();
    }
    Ok(output)
}

fn build_options(args: &RenderArgs) -> Result<BuildOptions, Box<dyn Error>> {
    let mut opts = BuildOptions::new(output_config(args)?);
    if let Some(page_size) = args.page_size {
        opts.pagination = PaginationOpts {
            page_size,
            ..PaginationOpts::default()
        };
    }
    opts.strict = args.strict;
    Ok(opts)
}

fn render_time(args: &RenderArgs) -> Result<DateTime<Utc>, Box<dyn Error>> {
    match args.timestamp {
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| format!("timestamp {secs} is out of range").into()),
        None => Ok(Utc::now()),
    }
}

pub fn run(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let source = SnapshotSource::new(Snapshot::load(&args.snapshot)?);
    let opts = build_options(args)?;
    let now = render_time(args)?;
    if args.dry_run {
        let sink = MemorySink::new();
        let manifest = build_site(&source, &source, &sink, &opts, now)?;
        print_summary(&manifest, "memory (dry run)");
        for path in sink.paths() {
            println!("  {}", path.display());
        }
        println!("  {} bytes total", sink.total_bytes());
        return Ok(());
    }
    let sink = DirSink::create(&opts.output.dir)?;
    let manifest = build_site(&source, &source, &sink, &opts, now)?;
    print_summary(&manifest, &opts.output.dir.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(argv: &[&str]) -> RenderArgs {
        Harness::parse_from(std::iter::once("render").chain(argv.iter().copied())).args
    }

    #[test]
    fn metadata_only_profile_can_be_overridden() {
        let args = parse(&[
            "--snapshot",
            "snap.json",
            "--out",
            "dist",
            "--metadata-only",
            "--id-encoding",
            "decimal",
            "--base-url",
            "https://example.org/fert/",
        ]);
        let output = output_config(&args).expect("config");
        assert_eq!(output.id_encoding, OutputIdEncoding::Decimal);
        assert!(!output.emit_pages);
        assert!(output.emit_bare_metadata);
        assert_eq!(output.base_url, "https://example.org/fert");
        assert_eq!(output.dir, PathBuf::from("dist"));
    }

    #[test]
    fn out_is_optional_only_for_dry_runs() {
        assert!(Harness::try_parse_from(["render", "--snapshot", "snap.json"]).is_err());
        let args = parse(&["--snapshot", "snap.json", "--dry-run"]);
        assert!(args.out.is_none());
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let args = parse(&["--snapshot", "s.json", "--dry-run", "--id-encoding", "base58"]);
        assert!(output_config(&args).is_err());
    }

    #[test]
    fn fixed_timestamp() {
        let args = parse(&["--snapshot", "s.json", "--dry-run", "--timestamp", "1700000000"]);
        assert_eq!(render_time(&args).expect("time").timestamp(), 1_700_000_000);
    }
}
