//! Simulated user activities: document uploads and quality-check auto-fixes.
//!
//! Neither activity touches real files or services. Both report completion
//! through notifications raised by the engine.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::random::RandomSource;

/// Largest upload accepted.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Interval between simulated progress steps.
pub const UPLOAD_STEP: Duration = Duration::from_millis(200);

/// Accepted document MIME types with the extensions that map to them.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
];

/// Infer a MIME type from a file name's extension.
pub fn mime_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_TYPES.iter().find(|(e, _)| *e == ext).map(|(_, mime)| *mime)
}

/// Format a byte count the way the upload list shows it ("1.5 KB").
pub fn format_file_size(bytes: u64) -> String {
    const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && index < SIZES.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZES[index])
}

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCandidate {
    pub name: String,
    pub size: u64,
    pub mime: Option<String>,
}

impl UploadCandidate {
    /// Candidate whose MIME type is inferred from `name`.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let mime = mime_for(&name).map(str::to_string);
        Self { name, size, mime }
    }

    /// Check size and type. The error message is user-facing.
    pub fn validate(&self) -> Result<()> {
        if self.size > MAX_UPLOAD_BYTES {
            return Err(EngineError::UploadRejected(
                "File too large. Maximum size is 50MB.".to_string(),
            ));
        }
        let supported = self
            .mime
            .as_deref()
            .is_some_and(|m| ALLOWED_TYPES.iter().any(|(_, allowed)| *allowed == m));
        if !supported {
            return Err(EngineError::UploadRejected(
                "File type not supported.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Processing,
    Complete,
}

/// An upload in flight or finished.
#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub name: String,
    pub size: u64,
    pub progress: f64,
    pub state: UploadState,
}

impl Upload {
    pub fn start(candidate: &UploadCandidate) -> Self {
        Self {
            name: candidate.name.clone(),
            size: candidate.size,
            progress: 0.0,
            state: UploadState::Processing,
        }
    }

    /// Advance by up to 10 percent. Returns true on the step that completes it.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state == UploadState::Complete {
            return false;
        }
        self.progress += rng.next_f64() * 10.0;
        if self.progress >= 100.0 {
            self.progress = 100.0;
            self.state = UploadState::Complete;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Critical,
    Warning,
    Fixing,
    Passed,
}

impl CheckState {
    pub fn label(&self) -> &'static str {
        match self {
            CheckState::Critical => "Critical",
            CheckState::Warning => "Warning",
            CheckState::Fixing => "Fixing...",
            CheckState::Passed => "Fixed",
        }
    }
}

/// A quality-assurance finding that can be auto-fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub name: String,
    pub state: CheckState,
    #[serde(skip)]
    pub fix_due: Option<Instant>,
}

impl QualityCheck {
    pub fn new(name: impl Into<String>, state: CheckState) -> Self {
        Self {
            name: name.into(),
            state,
            fix_due: None,
        }
    }

    /// Begin an auto-fix. No-op unless the check is currently failing.
    pub fn start_fix(&mut self, now: Instant, duration: Duration) -> bool {
        match self.state {
            CheckState::Critical | CheckState::Warning => {
                self.state = CheckState::Fixing;
                self.fix_due = Some(now + duration);
                true
            }
            CheckState::Fixing | CheckState::Passed => false,
        }
    }

    /// Complete the fix if its deadline has passed. Returns true when it completes.
    pub fn poll_fix(&mut self, now: Instant) -> bool {
        match self.fix_due {
            Some(due) if self.state == CheckState::Fixing && now >= due => {
                self.state = CheckState::Passed;
                self.fix_due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    #[test]
    fn test_mime_inference() {
        assert_eq!(mime_for("tender.PDF"), Some("application/pdf"));
        assert_eq!(mime_for("budget.xlsx").map(|m| m.ends_with("sheet")), Some(true));
        assert_eq!(mime_for("notes.txt"), None);
        assert_eq!(mime_for("no_extension"), None);
    }

    #[test]
    fn test_validation_rejections() {
        let too_big = UploadCandidate::new("huge.pdf", MAX_UPLOAD_BYTES + 1);
        let err = too_big.validate().unwrap_err();
        assert_eq!(err.to_string(), "Upload rejected: File too large. Maximum size is 50MB.");

        let wrong_type = UploadCandidate::new("image.png", 1024);
        assert!(matches!(wrong_type.validate(), Err(EngineError::UploadRejected(_))));

        assert!(UploadCandidate::new("rfp.docx", MAX_UPLOAD_BYTES).validate().is_ok());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn test_upload_completes_once() {
        let mut upload = Upload::start(&UploadCandidate::new("rfp.pdf", 10));
        let mut rng = FixedRandom(0.5);
        let steps = (0..19).filter(|_| upload.step(&mut rng)).count();
        assert_eq!(steps, 0);
        assert!(upload.step(&mut rng));
        assert_eq!(upload.progress, 100.0);
        assert!(!upload.step(&mut rng));
    }

    #[test]
    fn test_fix_lifecycle() {
        let start = Instant::now();
        let mut check = QualityCheck::new("Missing compliance matrix", CheckState::Critical);
        assert!(check.start_fix(start, Duration::from_secs(2)));
        assert!(!check.start_fix(start, Duration::from_secs(2)));
        assert!(!check.poll_fix(start + Duration::from_secs(1)));
        assert!(check.poll_fix(start + Duration::from_secs(2)));
        assert_eq!(check.state, CheckState::Passed);
        assert!(!check.start_fix(start, Duration::from_secs(2)));
    }
}
