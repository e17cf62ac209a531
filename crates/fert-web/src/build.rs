use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fert_core::errors::FertError;
use fert_core::metrics::display_amount;
use fert_core::{
    compute_metrics, DerivedMetrics, OutputConfig, OutputIdEncoding, RunConfig, TokenRecord,
};
use fert_source::{PaginationOpts, ProgressSource, TokenPages};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::collect::collect_site_data;
use crate::figures::{render_token_svg, FigureConfig};
use crate::metadata::build_metadata;
use crate::pages::{render_index, render_token_page, INDEX_PATH};
use crate::serde::to_canonical_json_bytes;
use crate::sink::ArtifactSink;

pub const MANIFEST_PATH: &str = "manifest.json";

/// Linear state of a run; there is no resumable state between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    Fetching,
    Computing,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Fetching => "fetching",
            RunPhase::Computing => "computing",
            RunPhase::Rendering => "rendering",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub output: OutputConfig,
    pub pagination: PaginationOpts,
    /// Abort on the first rejected token.
    pub strict: bool,
    pub figure: FigureConfig,
}

impl BuildOptions {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            pagination: PaginationOpts::default(),
            strict: false,
            figure: FigureConfig::default(),
        }
    }
}

impl From<&RunConfig> for BuildOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            output: config.output.clone(),
            pagination: PaginationOpts::from(&config.source),
            strict: config.strict,
            figure: FigureConfig::default(),
        }
    }
}

/// Rendered artifacts of one token, not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenArtifacts {
    pub output_id: String,
    pub image: String,
    pub metadata: Vec<u8>,
    pub page: Option<String>,
}

impl TokenArtifacts {
    /// Relative paths and contents in write order.
    pub fn files(&self, config: &OutputConfig) -> Vec<(PathBuf, &[u8])> {
        let id = &self.output_id;
        let mut files = vec![
            (PathBuf::from(format!("{id}.svg")), self.image.as_bytes()),
            (PathBuf::from(format!("{id}.json")), self.metadata.as_slice()),
        ];
        if config.emit_bare_metadata {
            files.push((PathBuf::from(id), self.metadata.as_slice()));
        }
        if let Some(page) = &self.page {
            files.push((PathBuf::from(format!("{id}.html")), page.as_bytes()));
        }
        files
    }
}

/// Renders the image, metadata and (optional) page of one token.
pub fn render_token_artifacts(
    token: &TokenRecord,
    metrics: &DerivedMetrics,
    output_id: &str,
    config: &OutputConfig,
    figure: &FigureConfig,
) -> Result<TokenArtifacts, FertError> {
    let metadata = build_metadata(token, metrics, output_id, config);
    Ok(TokenArtifacts {
        output_id: output_id.to_string(),
        image: render_token_svg(token, metrics, figure),
        metadata: to_canonical_json_bytes(&metadata)?,
        page: config
            .emit_pages
            .then(|| render_token_page(token, metrics, output_id, config)),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedToken {
    pub id: u64,
    pub season: u32,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub token_count: usize,
    pub rejected: Vec<RejectedToken>,
    pub global_progress: u64,
    pub page_requests: usize,
    pub pagination_exhausted: bool,
    pub duplicates_dropped: usize,
    pub id_encoding: OutputIdEncoding,
    pub generated_at: String,
    pub artifacts: Vec<ArtifactEntry>,
}

struct Run {
    phase: RunPhase,
}

impl Run {
    fn enter(&mut self, phase: RunPhase) {
        self.phase = phase;
        info!(phase = %phase, "run phase");
    }
}

struct Writer<'a, S: ArtifactSink + ?Sized> {
    sink: &'a S,
    entries: Vec<ArtifactEntry>,
}

impl<S: ArtifactSink + ?Sized> Writer<'_, S> {
    fn write(&mut self, path: PathBuf, bytes: &[u8]) -> Result<(), FertError> {
        self.sink.write(&path, bytes)?;
        self.entries.push(ArtifactEntry {
            path: path.to_string_lossy().into_owned(),
            sha256: hex::encode(Sha256::digest(bytes)),
        });
        Ok(())
    }
}

/// Runs the whole pipeline: fetch, compute, render, then write the index and
/// manifest last.
pub fn build_site<G, P, S>(
    progress: &G,
    pages: &P,
    sink: &S,
    opts: &BuildOptions,
    now: DateTime<Utc>,
) -> Result<BuildManifest, FertError>
where
    G: ProgressSource + ?Sized,
    P: TokenPages + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let mut run = Run {
        phase: RunPhase::Fetching,
    };
    match run_phases(&mut run, progress, pages, sink, opts, now) {
        Ok(manifest) => {
            run.enter(RunPhase::Done);
            Ok(manifest)
        }
        Err(err) => {
            error!(phase = %run.phase, error = %err, "run failed");
            run.enter(RunPhase::Failed);
            Err(err)
        }
    }
}

fn run_phases<G, P, S>(
    run: &mut Run,
    progress: &G,
    pages: &P,
    sink: &S,
    opts: &BuildOptions,
    now: DateTime<Utc>,
) -> Result<BuildManifest, FertError>
where
    G: ProgressSource + ?Sized,
    P: TokenPages + ?Sized,
    S: ArtifactSink + ?Sized,
{
    run.enter(RunPhase::Fetching);
    let data = collect_site_data(progress, pages, &opts.pagination)?;
    let global = data.progress;

    run.enter(RunPhase::Computing);
    let computed: Vec<_> = data
        .fetch
        .tokens
        .par_iter()
        .map(|token| compute_metrics(token, global).map(|metrics| metrics.observed(now)))
        .collect();
    let mut accepted = Vec::with_capacity(computed.len());
    let mut rejected = Vec::new();
    for (token, result) in data.fetch.tokens.iter().zip(computed) {
        match result {
            Ok(metrics) => accepted.push((token, metrics)),
            Err(err) if !opts.strict => {
                warn!(id = token.id, season = token.season, error = %err, "rejected token");
                rejected.push(RejectedToken {
                    id: token.id,
                    season: token.season,
                    code: err.code().to_string(),
                    message: err.info().message.clone(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    run.enter(RunPhase::Rendering);
    let output = &opts.output;
    let rendered: Vec<TokenArtifacts> = accepted
        .par_iter()
        .map(|(token, metrics)| {
            let output_id = output.id_encoding.encode(token.id);
            render_token_artifacts(token, metrics, &output_id, output, &opts.figure)
        })
        .collect::<Result<_, _>>()?;

    let mut writer = Writer {
        sink,
        entries: Vec::new(),
    };
    for ((token, metrics), artifacts) in accepted.iter().zip(&rendered) {
        info!(
            id = token.id,
            season = token.season,
            output_id = %artifacts.output_id,
            remaining = %format!("{:.2}", display_amount(metrics.remaining)),
            pct = %format!("{:.2}", metrics.percent()),
            "rendered token"
        );
        for (path, bytes) in artifacts.files(output) {
            debug!(path = %path.display(), bytes = bytes.len(), "write artifact");
            writer.write(path, bytes)?;
        }
    }

    let indexed: Vec<TokenRecord> = accepted.iter().map(|(token, _)| (*token).clone()).collect();
    writer.write(PathBuf::from(INDEX_PATH), render_index(&indexed, output).as_bytes())?;

    let manifest = BuildManifest {
        token_count: accepted.len(),
        rejected,
        global_progress: global,
        page_requests: data.fetch.requests,
        pagination_exhausted: data.fetch.exhausted,
        duplicates_dropped: data.fetch.duplicates,
        id_encoding: output.id_encoding,
        generated_at: now.to_rfc3339(),
        artifacts: writer.entries,
    };
    sink.write(
        &PathBuf::from(MANIFEST_PATH),
        &to_canonical_json_bytes(&manifest)?,
    )?;
    info!(
        tokens = manifest.token_count,
        rejected = manifest.rejected.len(),
        artifacts = manifest.artifacts.len(),
        "artifacts written"
    );
    Ok(manifest)
}
