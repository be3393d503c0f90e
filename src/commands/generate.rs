use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use pixdesk::config::WorkspaceConfig;
use pixdesk::pipeline::GenerateOutcome;
use pixdesk::resource::ImageSource;
use pixdesk::workspace::{Workspace, WorkspaceEvent};
use web_time::Instant;

#[derive(Args)]
pub struct GenerateArgs {
    /// Source image for the dataset
    pub image: PathBuf,

    /// Number of images to generate (defaults to the configured count)
    #[arg(short = 'n', long)]
    pub count: Option<u32>,
}

pub fn run(args: &GenerateArgs, config: WorkspaceConfig) -> Result<()> {
    let mut ws = Workspace::connect(config)?;
    let now = Instant::now();

    ws.open_dataset_dialog();
    ws.choose_dataset_file(&ImageSource::from_path(&args.image), now)?;
    if let Some(count) = args.count {
        ws.dialog_mut().set_count(count);
    }
    println!(
        "Generating {} images from {}",
        ws.dialog().count(),
        ws.dialog().file_label()
    );

    ws.generate(now)?;
    let pb = super::upload_bar("Uploading")?;
    let outcome = super::wait_for_event(&mut ws, &pb, Workspace::generate_state, |event| match event {
        WorkspaceEvent::GenerationFinished(outcome) => Some(outcome),
        _ => None,
    });
    pb.finish_and_clear();

    match outcome {
        GenerateOutcome::Succeeded(message) => {
            println!("{}", message);
            Ok(())
        }
        GenerateOutcome::Failed(info) => bail!("{}", info),
    }
}
