use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use knowledge_atlas::app::AtlasApp;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "data/posts.json")]
    posts: PathBuf,

    #[arg(long)]
    focal: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_atlas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "knowledge-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(AtlasApp::new(
                cc,
                args.posts.clone(),
                args.focal.clone(),
            )))
        }),
    )
}
