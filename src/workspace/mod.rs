//! Workspace controller.
//!
//! [`Workspace`] owns every piece of workspace state and is driven by discrete
//! calls from a single UI thread: input events, user commands and a periodic
//! [`Workspace::tick`] that applies submission progress and fires timers.
//! Renderers read state through the accessors and never mutate it.

use std::sync::Arc;

use pixdesk_net::{HttpTransport, Transport};
use serde_json::Value;
use web_time::Instant;

use crate::config::WorkspaceConfig;
use crate::dialog::DatasetDialog;
use crate::error::{Result, SubmissionError, WorkspaceError};
use crate::mode::{InteractionMode, PointerButton, PointerOutcome, PressIntent};
use crate::model::ProblemId;
use crate::notice::{Notice, NoticeBoard};
use crate::pipeline::{AnalyzePipeline, GenerateOutcome, GeneratePipeline};
use crate::resource::ImageSource;
use crate::state::{ImageCollection, LoadedImage, ProblemList, SubmissionState};
use crate::widget_state::ImageViewState;
use crate::zoom_math::{Point, ViewportState, ZoomLimits};

/// Something that happened during [`Workspace::tick`].
#[derive(Debug)]
pub enum WorkspaceEvent {
    /// Analysis ended; failures are handed back to the caller as well as shown
    AnalysisFinished(std::result::Result<Value, SubmissionError>),
    /// Dataset generation ended; the outcome has already been shown
    GenerationFinished(GenerateOutcome),
    DialogClosed,
    NoticeHidden,
}

/// The interactive image workspace.
pub struct Workspace {
    config: WorkspaceConfig,
    limits: ZoomLimits,

    images: ImageCollection,
    viewport: ViewportState,
    view: ImageViewState,
    mode: InteractionMode,
    problems: ProblemList,

    analyze: AnalyzePipeline,
    generate: GeneratePipeline,
    dialog: DatasetDialog,
    notices: NoticeBoard,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig, transport: Arc<dyn Transport>) -> Self {
        let limits = ZoomLimits::from(&config.viewport);
        let analyze = AnalyzePipeline::new(Arc::clone(&transport), &config.server);
        let generate = GeneratePipeline::new(transport, &config.server, config.generate);
        let dialog = DatasetDialog::new(config.timing.dialog_close(), config.generate.default_count);
        let notices = NoticeBoard::new(config.timing.notice());

        Self {
            config,
            limits,
            images: ImageCollection::new(),
            viewport: ViewportState::identity(),
            view: ImageViewState::new(),
            mode: InteractionMode::Normal,
            problems: ProblemList::new(),
            analyze,
            generate,
            dialog,
            notices,
        }
    }

    /// Workspace talking HTTP to the configured server.
    pub fn connect(config: WorkspaceConfig) -> pixdesk_net::Result<Self> {
        let transport = HttpTransport::new(&config.server.base_url, config.server.timeout_ms)?;
        log::info!("Using analysis server {}", transport.base_url());
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    pub fn current_image(&self) -> Option<&LoadedImage> {
        self.images.current()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    pub fn problems_mut(&mut self) -> &mut ProblemList {
        &mut self.problems
    }

    pub fn analysis_state(&self) -> &SubmissionState {
        self.analyze.state()
    }

    pub fn generate_state(&self) -> &SubmissionState {
        self.generate.state()
    }

    pub fn dialog(&self) -> &DatasetDialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut DatasetDialog {
        &mut self.dialog
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn is_dragging(&self) -> bool {
        self.view.is_dragging()
    }

    pub fn active_captures(&self) -> usize {
        self.view.active_captures()
    }

    /// Whether image-mutating controls should be enabled.
    pub fn can_modify_images(&self) -> bool {
        !self.analyze.is_in_progress()
    }

    fn ensure_modifiable(&self) -> Result<()> {
        if self.can_modify_images() {
            Ok(())
        } else {
            Err(WorkspaceError::Busy)
        }
    }

    fn report<T>(&mut self, result: Result<T>, now: Instant) -> Result<T> {
        if let Err(e) = &result {
            self.notices.show_error(&e.info(), now);
        }
        result
    }

    // --- Images ---

    /// Back to scale 1 at the origin.
    pub fn reset_view(&mut self) {
        self.view.end_drag();
        self.viewport = ViewportState::identity();
    }

    /// Append images and view the first one.
    pub fn load_images(&mut self, files: &[ImageSource], now: Instant) -> Result<usize> {
        let result = self
            .ensure_modifiable()
            .and_then(|()| self.images.load(files));
        let loaded = self.report(result, now)?;
        if loaded > 0 {
            self.reset_view();
        }
        Ok(loaded)
    }

    /// Swap the whole collection for `files`.
    pub fn replace_images(&mut self, files: &[ImageSource], now: Instant) -> Result<usize> {
        let result = self
            .ensure_modifiable()
            .and_then(|()| self.images.replace(files));
        let loaded = self.report(result, now)?;
        self.reset_view();
        Ok(loaded)
    }

    pub fn select_image(&mut self, index: usize) -> Result<()> {
        self.images.select(index)?;
        self.reset_view();
        Ok(())
    }

    pub fn next_image(&mut self) -> Option<usize> {
        let index = self.images.select_next()?;
        self.reset_view();
        Some(index)
    }

    pub fn prev_image(&mut self) -> Option<usize> {
        let index = self.images.select_prev()?;
        self.reset_view();
        Some(index)
    }

    pub fn remove_image(&mut self, index: usize) -> Result<LoadedImage> {
        self.ensure_modifiable()?;
        let removed = self.images.remove(index)?;
        self.reset_view();
        Ok(removed)
    }

    pub fn delete_all_images(&mut self) -> Result<usize> {
        self.ensure_modifiable()?;
        self.reset_view();
        Ok(self.images.delete_all())
    }

    // --- Pointer input ---

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode == mode {
            return;
        }
        if self.view.end_drag() {
            log::debug!("Mode change ended an active drag");
        }
        self.mode = mode;
        log::debug!("Interaction mode: {}", mode);
    }

    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Wheel over the image: one zoom step per event.
    pub fn wheel(&mut self, delta_y: f32) -> PointerOutcome {
        if self.images.is_empty() {
            return PointerOutcome::Ignored;
        }
        match self.mode.route_wheel(delta_y) {
            Some(direction) => {
                self.viewport = self.viewport.zoom(direction, &self.limits);
                PointerOutcome::Zoomed(self.viewport.zoom_percent())
            }
            None => PointerOutcome::Ignored,
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton, pointer: Point) -> PointerOutcome {
        if button != PointerButton::Primary || self.images.is_empty() {
            return PointerOutcome::Ignored;
        }
        match self.mode.route_press() {
            PressIntent::BeginPan => {
                self.view.start_drag(self.viewport.begin_drag(pointer));
                PointerOutcome::PanStarted
            }
            PressIntent::Pick => {
                let point = self.viewport.screen_to_image(pointer);
                let problem = self.problems.active();
                if let Some(id) = problem {
                    if let Err(e) = self.problems.assign_point(id, point) {
                        log::warn!("Could not store picked point: {}", e);
                    }
                }
                PointerOutcome::PointPicked { point, problem }
            }
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) -> PointerOutcome {
        let Some(anchor) = self.view.anchor() else {
            return PointerOutcome::Ignored;
        };
        let position = anchor.continue_drag(pointer, self.config.viewport.drag_damping);
        self.viewport.position = position;
        PointerOutcome::Panned(position)
    }

    pub fn pointer_up(&mut self, button: PointerButton) -> PointerOutcome {
        if button == PointerButton::Primary && self.view.end_drag() {
            PointerOutcome::PanEnded
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Pick a problem to receive the next coordinate.
    pub fn set_active_problem(&mut self, id: ProblemId) -> Result<()> {
        self.problems.set_active(id)
    }

    // --- Submissions ---

    /// Upload every image for analysis. The result arrives through
    /// [`WorkspaceEvent::AnalysisFinished`].
    pub fn analyze(&mut self, now: Instant) -> Result<usize> {
        let result = self.analyze.submit(&self.images);
        self.report(result, now)
    }

    pub fn open_dataset_dialog(&mut self) {
        self.dialog.open();
    }

    pub fn choose_dataset_file(&mut self, source: &ImageSource, now: Instant) -> Result<()> {
        let result = self.dialog.choose_file(source);
        self.report(result, now)
    }

    /// Submit the dataset dialog's form.
    pub fn generate(&mut self, now: Instant) -> Result<()> {
        let result = self.generate.submit(self.dialog.source(), self.dialog.count());
        self.report(result, now)
    }

    /// Escape key: closes the dataset dialog when it is open.
    pub fn escape(&mut self, now: Instant) -> bool {
        self.dialog.escape(now)
    }

    pub fn is_submitting(&self) -> bool {
        self.analyze.is_in_progress() || self.generate.is_in_progress()
    }

    /// Abort any in-flight submission. Completion still arrives via `tick`.
    pub fn cancel_submission(&mut self) {
        self.analyze.cancel();
        self.generate.cancel();
    }

    /// Apply submission progress and fire due timers.
    pub fn tick(&mut self, now: Instant) -> Vec<WorkspaceEvent> {
        let mut events = Vec::new();

        if let Some(result) = self.analyze.poll() {
            if let Err(e) = &result {
                if !e.is_cancelled() {
                    self.notices.show_error(e.info(), now);
                }
            }
            events.push(WorkspaceEvent::AnalysisFinished(result));
        }

        if let Some(outcome) = self.generate.poll() {
            match &outcome {
                GenerateOutcome::Succeeded(message) => {
                    self.notices.show_info(message.as_str(), now);
                    self.dialog.close();
                    self.dialog.reset_form();
                }
                GenerateOutcome::Failed(info) => self.notices.show_error(info, now),
            }
            events.push(WorkspaceEvent::GenerationFinished(outcome));
        }

        if self.dialog.tick(now) {
            events.push(WorkspaceEvent::DialogClosed);
        }
        if self.notices.tick(now) {
            events.push(WorkspaceEvent::NoticeHidden);
        }
        events
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.is_submitting() {
            log::info!("Workspace dropped mid-submission, aborting");
            self.cancel_submission();
        }
        self.view.end_drag();
        let released = self.images.delete_all();
        log::debug!("Workspace torn down ({} images released)", released);
    }
}
