//! Assessment progress shared between the assessment and recommendation pages.

#[cfg(test)]
#[path = "assessment_test.rs"]
mod assessment_test;

use crate::net::speech::{AssessmentReport, AssessmentSentence};

/// Sentence being read, the last report, and the upload status line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssessmentState {
    pub sentence: Option<AssessmentSentence>,
    pub report: Option<AssessmentReport>,
    pub uploading: bool,
    pub message: Option<String>,
}

impl AssessmentState {
    pub fn begin_upload(&mut self) {
        self.uploading = true;
        self.message = None;
    }

    pub fn finish_upload<E: std::fmt::Display>(&mut self, outcome: Result<AssessmentReport, E>) {
        self.uploading = false;
        match outcome {
            Ok(report) => {
                self.report = Some(report);
                self.message = Some("Analysis complete.".to_owned());
            }
            Err(e) => self.message = Some(format!("Upload failed: {e}")),
        }
    }

    /// Weak phonemes from the latest analysis, empty before the first one.
    pub fn weak_phonemes(&self) -> &[String] {
        self.report.as_ref().map_or(&[], |r| r.metrics.weak_phonemes.as_slice())
    }
}
