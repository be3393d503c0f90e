pub mod analyze;
pub mod config;
pub mod generate;

use std::thread;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use pixdesk::state::SubmissionState;
use pixdesk::workspace::{Workspace, WorkspaceEvent};
use web_time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn upload_bar(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}

/// Drive the workspace until `pick` accepts an event, mirroring upload
/// progress from `state` onto `pb`.
pub fn wait_for_event<T>(
    ws: &mut Workspace,
    pb: &ProgressBar,
    state: fn(&Workspace) -> &SubmissionState,
    mut pick: impl FnMut(WorkspaceEvent) -> Option<T>,
) -> T {
    loop {
        for event in ws.tick(Instant::now()) {
            if let Some(value) = pick(event) {
                return value;
            }
        }
        pb.set_position(u64::from(state(ws).progress_percent()));
        thread::sleep(POLL_INTERVAL);
    }
}
