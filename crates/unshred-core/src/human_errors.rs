// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion
// about what to change in the photograph or the settings.

use crate::error::UnshredError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change the input (retake the photo, pick another file).
    ActionRequired,
    /// The request itself is wrong; fix the arguments or configuration.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert an `UnshredError` into a `HumanError`.
///
/// Reconstruction is deterministic, so nothing here is ever worth retrying
/// with the same input.
pub fn humanize_error(err: &UnshredError) -> HumanError {
    match err {
        UnshredError::EmptyInput(_) => HumanError {
            message: "We couldn't find any paper strips in this photo.".into(),
            suggestion: "Lay the strips on a plain, contrasting background with a little space between them and take the photo again.".into(),
            severity: Severity::ActionRequired,
        },

        UnshredError::EmptyRegion { strip } => HumanError {
            message: format!("Strip number {} looked empty after cropping.", strip + 1),
            suggestion: "Make sure every strip is fully inside the photo and in focus, or lower the number of refinement passes.".into(),
            severity: Severity::ActionRequired,
        },

        UnshredError::OutOfRange { requested, limit } => HumanError {
            message: "The edge width is too large for these strips.".into(),
            suggestion: format!(
                "Use a side width between 1 and {} pixels (you asked for {requested}).",
                limit.saturating_sub(1)
            ),
            severity: Severity::Permanent,
        },

        UnshredError::InvalidArgument(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the command line options and configuration file. (Detail: {detail})"),
            severity: Severity::Permanent,
        },

        UnshredError::ImageError(detail) => HumanError {
            message: "We couldn't read or write the image.".into(),
            suggestion: format!("Check that the file is a JPEG or PNG photo and is not damaged. (Detail: {detail})"),
            severity: Severity::ActionRequired,
        },

        UnshredError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "We couldn't find that file.".into(),
                suggestion: "Check the file name and folder, then try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We don't have permission to use that file.".into(),
                suggestion: "Pick a file or folder you are allowed to read and write.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "Something went wrong reading or writing a file.".into(),
                suggestion: format!("Check there is enough disk space and try again. (Detail: {io_err})"),
                severity: Severity::ActionRequired,
            },
        },

        UnshredError::Serialization(detail) => HumanError {
            message: "The configuration file couldn't be understood.".into(),
            suggestion: format!("Make sure it is valid JSON. (Detail: {detail})"),
            severity: Severity::Permanent,
        },
    }
}
