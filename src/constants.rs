//! Global constants for the pixdesk workspace.
//!
//! Defaults for everything the configuration file can override live here,
//! grouped by the part of the workspace that consumes them.

/// Viewport zoom/pan constants.
pub mod zoom {
    /// Smallest zoom level in percent
    pub const MIN_PERCENT: u32 = 50;
    /// Largest zoom level in percent
    pub const MAX_PERCENT: u32 = 400;
    /// Zoom change per wheel tick in percent
    pub const STEP_PERCENT: u32 = 10;
    /// Factor applied to drag deltas (1.0 = pointer-locked panning)
    pub const DRAG_DAMPING: f32 = 1.0;
}

/// Remote analysis service.
pub mod server {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    pub const ANALYZE_PATH: &str = "/analyze";
    pub const GENERATE_PATH: &str = "/generate";
    /// Client-side timeout for a whole submission
    pub const TIMEOUT_MS: u64 = 30_000;

    /// Multipart field carrying each analyzed image
    pub const ANALYZE_FIELD: &str = "images";
    /// Multipart field carrying the dataset source image
    pub const GENERATE_FILE_FIELD: &str = "file";
    /// Multipart field carrying the requested image count
    pub const GENERATE_COUNT_FIELD: &str = "count";
}

/// Timers for transient UI surfaces.
pub mod timing {
    /// How long an inline notice stays visible
    pub const NOTICE_MS: u64 = 2_000;
    /// Dialog slide-out duration before the close callback fires
    pub const DIALOG_CLOSE_MS: u64 = 400;
}

/// Dataset generation limits.
pub mod generate {
    pub const MIN_COUNT: u32 = 1;
    pub const MAX_COUNT: u32 = 100;
    pub const DEFAULT_COUNT: u32 = 1;
}

/// User-facing strings.
pub mod text {
    /// File label shown while nothing is selected
    pub const FILE_PLACEHOLDER: &str = "이미지를 선택해주세요";
    /// Analyze pressed with an empty collection
    pub const NO_IMAGES: &str = "이미지를 업로드 해주세요.";
    /// Generic analyze failure
    pub const ANALYZE_FAILED: &str = "이미지 분석 중 오류가 발생했습니다.";
    /// Generate pressed without a source image
    pub const NO_SOURCE_IMAGE: &str = "원본 이미지를 선택해주세요.";
    /// Generate count outside the allowed `min..=max` range
    pub fn count_out_of_range(min: u32, max: u32) -> String {
        format!("생성할 이미지 수는 {}장 이상 {}장 이하여야 합니다.", min, max)
    }
    /// Generic dataset generation failure
    pub const GENERATE_FAILED: &str = "데이터셋 생성 중 오류가 발생했습니다.";
    /// Dataset generation succeeded without a server message
    pub const GENERATE_DONE: &str = "데이터셋이 생성되었습니다.";
    /// Image file could not be read or is not an image
    pub const UNREADABLE_IMAGE: &str = "이미지를 불러올 수 없습니다.";
    /// Image list change attempted while a submission is in flight
    pub const SUBMISSION_BUSY: &str = "요청을 처리하는 중입니다. 잠시 후 다시 시도해주세요.";
    /// Image index outside the collection
    pub const IMAGE_NOT_FOUND: &str = "선택한 이미지를 찾을 수 없습니다.";
    /// Problem id that is not in the list
    pub const UNKNOWN_PROBLEM: &str = "존재하지 않는 문제입니다.";

    /// Prefix of numbered problem names ("문제 3")
    pub const PROBLEM_PREFIX: &str = "문제";
    /// Display name of the supervisor slot
    pub const SUPERVISOR_NAME: &str = "감독관";
    /// Value of a problem that has not been assigned yet
    pub const UNASSIGNED: &str = "미지정";
}
