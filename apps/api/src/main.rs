mod config;
mod errors;
mod extraction;
mod models;
mod ner;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::extraction::{PdfExtractTextLayer, PdftoppmRasterizer, TesseractOcr, TextExtractor};
use crate::ner::{EntityTagger, RemoteTagger, RuleTagger};
use crate::resume::sections::SectionOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume parser v{}", env!("CARGO_PKG_VERSION"));

    // Text extraction: pdf-extract text layer, pdftoppm + tesseract for scans
    let extractor = Arc::new(TextExtractor::new(
        Arc::new(PdfExtractTextLayer),
        Arc::new(PdftoppmRasterizer::new(&config.pdftoppm_bin, config.ocr_dpi)),
        Arc::new(TesseractOcr::new(&config.tesseract_bin, &config.ocr_lang)),
    ));
    info!(
        "OCR fallback: {} at {} dpi, {} (lang {})",
        config.pdftoppm_bin, config.ocr_dpi, config.tesseract_bin, config.ocr_lang
    );

    // Entity tagger, built once and shared (RuleTagger unless NER_ENDPOINT is set)
    let tagger: Arc<dyn EntityTagger> = match &config.ner_endpoint {
        Some(endpoint) => Arc::new(RemoteTagger::new(endpoint.clone())?),
        None => Arc::new(RuleTagger),
    };
    info!("Entity tagger initialized (backend: {})", tagger.backend());

    let section_options = SectionOptions {
        match_all_occurrences: config.match_all_sections,
    };

    // Build app state
    let state = AppState {
        extractor,
        tagger,
        section_options,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
