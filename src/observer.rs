use indicatif::ProgressBar;
use std::path::Path;

use crate::types::{SplitEntry, SplitReport};
use crate::utils::create_spinner;

/// Receives split-building events. All methods default to no-ops.
pub trait BuildObserver {
    fn split_started(&mut self, _split: &SplitEntry) {}

    fn sample_saved(&mut self, _split: &SplitEntry, _class_name: &str, _path: &Path) {}

    fn split_finished(&mut self, _report: &SplitReport) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Spinner per split plus a logged summary once the split completes.
#[derive(Default)]
pub struct LogObserver {
    pb: Option<ProgressBar>,
}

impl BuildObserver for LogObserver {
    fn split_started(&mut self, split: &SplitEntry) {
        log::info!(
            "Building split '{}' -> {}/ ({} per class)",
            split.source_split,
            split.target_dir,
            split.quota
        );
        self.pb = Some(create_spinner(&split.source_split));
    }

    fn sample_saved(&mut self, _split: &SplitEntry, class_name: &str, _path: &Path) {
        if let Some(pb) = &self.pb {
            pb.inc(1);
            pb.set_message(class_name.to_string());
        }
    }

    fn split_finished(&mut self, report: &SplitReport) {
        if let Some(pb) = self.pb.take() {
            pb.finish_with_message(format!("{} processing complete", report.source_split));
        }
        report.print_summary();
    }
}

impl Drop for LogObserver {
    // A split that failed never reaches `split_finished`
    fn drop(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.abandon_with_message("aborted");
        }
    }
}
