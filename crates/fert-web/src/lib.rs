//! Static artifact generator for Fertilizer tokens: one SVG, one metadata
//! document and optionally one HTML page per token, plus a site index.

pub mod build;
pub mod canvas;
pub mod collect;
pub mod figures;
pub mod metadata;
pub mod pages;
pub mod serde;
pub mod sink;

pub use build::{build_site, render_token_artifacts, BuildManifest, BuildOptions, TokenArtifacts};
pub use canvas::{Canvas, Shape};
pub use collect::{collect_site_data, SiteData};
pub use figures::{render_token_svg, FigureConfig};
pub use metadata::{build_metadata, TokenMetadata};
pub use pages::{render_index, render_token_page};
pub use sink::{ArtifactSink, DirSink, MemorySink};
