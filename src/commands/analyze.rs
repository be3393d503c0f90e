use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pixdesk::config::WorkspaceConfig;
use pixdesk::resource::ImageSource;
use pixdesk::workspace::{Workspace, WorkspaceEvent};
use web_time::Instant;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Image files, submitted in the given order
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Write the server response to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs, config: WorkspaceConfig) -> Result<()> {
    let mut ws = Workspace::connect(config)?;

    let sources: Vec<ImageSource> = args.images.iter().map(ImageSource::from_path).collect();
    let loaded = ws.load_images(&sources, Instant::now())?;
    println!("Loaded {} images", loaded);
    for image in ws.images().items() {
        println!(
            "  {} ({}x{}, {})",
            image.display_name, image.width, image.height, image.mime
        );
    }

    ws.analyze(Instant::now())?;
    let pb = super::upload_bar("Analyzing")?;
    let result = super::wait_for_event(&mut ws, &pb, Workspace::analysis_state, |event| match event {
        WorkspaceEvent::AnalysisFinished(result) => Some(result),
        _ => None,
    });
    pb.finish_and_clear();

    let payload = result?;
    let pretty = serde_json::to_string_pretty(&payload)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, pretty)?;
            println!("Saved response to {}", path.display());
        }
        None => println!("{}", pretty),
    }
    Ok(())
}
