pub mod build;
pub mod render;
pub mod version;

use fert_web::BuildManifest;

pub(crate) fn print_summary(manifest: &BuildManifest, destination: &str) {
    println!(
        "wrote {} tokens ({} rejected, {} artifacts) to {destination}",
        manifest.token_count,
        manifest.rejected.len(),
        manifest.artifacts.len()
    );
    for rejected in &manifest.rejected {
        println!("  rejected {} (season {}): {}", rejected.id, rejected.season, rejected.message);
    }
    if manifest.pagination_exhausted {
        println!(
            "  token list is partial: stopped after {} page requests",
            manifest.page_requests
        );
    }
}
