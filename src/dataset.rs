use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::io::{ensure_dirs, write_dataset_yaml, write_labels_csv};
use crate::labels::{map_labels, LabelIndex};
use crate::observer::BuildObserver;
use crate::source::SampleSource;
use crate::types::{
    ClassCount, ClassSelection, DatasetReport, ManifestRow, SplitEntry, SplitReport, SplitSpec,
};
use crate::utils::class_dir_name;

/// Options shared by every split build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Write `labels.csv` at each split root
    pub make_csv: bool,
    pub jpeg_quality: u8,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            make_csv: false,
            jpeg_quality: 95,
        }
    }
}

// Per-class saved counts for one split, in target name order. Duplicate names
// share one counter.
struct SavedCounts {
    counts: Vec<ClassCount>,
}

impl SavedCounts {
    fn new(target_names: &[String]) -> Self {
        let mut counts: Vec<ClassCount> = Vec::with_capacity(target_names.len());
        for name in target_names {
            if !counts.iter().any(|count| &count.name == name) {
                counts.push(ClassCount {
                    name: name.clone(),
                    saved: 0,
                });
            }
        }
        Self { counts }
    }

    fn get(&self, class_name: &str) -> usize {
        self.counts
            .iter()
            .find(|count| count.name == class_name)
            .map_or(0, |count| count.saved)
    }

    fn increment(&mut self, class_name: &str) {
        if let Some(count) = self.counts.iter_mut().find(|count| count.name == class_name) {
            count.saved += 1;
        }
    }

    fn all_full(&self, quota: usize) -> bool {
        self.counts.iter().all(|count| count.saved >= quota)
    }
}

/// Deterministic sample filename: `<position>_<label id>_<class>.jpg`
pub fn sample_file_name(position: usize, label: usize, class_dir: &str) -> String {
    format!("{:06}_{:02}_{}.jpg", position, label, class_dir)
}

/// Stream one source split into `<out_root>/<target_dir>/<class>/`, saving at
/// most `split.quota` images per selected class.
///
/// Stops pulling from the source as soon as every class is full. A save
/// failure aborts the split; running out of samples does not.
pub fn build_split(
    source: &dyn SampleSource,
    split: &SplitEntry,
    out_root: &Path,
    labels: &LabelIndex,
    options: &BuildOptions,
    observer: &mut dyn BuildObserver,
) -> Result<SplitReport> {
    let split_dir = out_root.join(&split.target_dir);
    fs::create_dir_all(&split_dir)?;

    observer.split_started(split);

    let quota = split.quota;
    let mut saved_counts = SavedCounts::new(labels.target_names());
    let mut rows = Vec::new();
    let mut pulled = 0;

    if saved_counts.all_full(quota) {
        debug!(
            "[{}] nothing to collect, source left untouched",
            split.source_split
        );
    } else {
        for (position, sample) in source.samples(&split.source_split)?.enumerate() {
            pulled += 1;
            let sample = sample?;
            if !labels.is_target(sample.label) {
                continue;
            }
            let Some(class_name) = labels.name(sample.label) else {
                continue;
            };
            if saved_counts.get(class_name) >= quota {
                continue;
            }

            let class_dir = class_dir_name(class_name);
            let file_name = sample_file_name(position, sample.label, &class_dir);
            let out_path = split_dir.join(&class_dir).join(&file_name);
            sample.image.save_jpeg(&out_path, options.jpeg_quality)?;
            saved_counts.increment(class_name);
            observer.sample_saved(split, class_name, &out_path);

            if options.make_csv {
                rows.push(ManifestRow {
                    filename: format!("{}/{}", class_dir, file_name),
                    label: class_name.to_string(),
                });
            }

            if saved_counts.all_full(quota) {
                debug!(
                    "[{}] all classes reached {} samples after {} pulls",
                    split.source_split, quota, pulled
                );
                break;
            }
        }
    }

    let manifest = if options.make_csv {
        Some(write_labels_csv(&split_dir, &rows)?)
    } else {
        None
    };

    let report = SplitReport {
        source_split: split.source_split.clone(),
        target_dir: split.target_dir.clone(),
        quota,
        counts: saved_counts.counts,
        pulled,
        manifest,
    };
    observer.split_finished(&report);
    Ok(report)
}

/// Full preparation pipeline: map labels, lay out directories, build the train
/// then validation split, and write dataset.yaml.
pub fn prepare_dataset(
    source: &dyn SampleSource,
    selection: &ClassSelection,
    splits: &SplitSpec,
    out_root: &Path,
    options: &BuildOptions,
    observer: &mut dyn BuildObserver,
) -> Result<DatasetReport> {
    let taxonomy = source.taxonomy()?;
    let labels = map_labels(&taxonomy, selection)?;
    info!(
        "Selected {} of {} source labels: {:?}",
        labels.target_ids().len(),
        labels.taxonomy_len(),
        labels.target_names()
    );

    ensure_dirs(out_root, labels.target_names(), splits)?;

    let mut reports = Vec::with_capacity(2);
    for split in splits.entries() {
        reports.push(build_split(
            source, split, out_root, &labels, options, observer,
        )?);
    }

    let dataset_yaml = write_dataset_yaml(out_root, labels.target_names(), splits)?;
    Ok(DatasetReport {
        dataset_yaml,
        splits: reports,
    })
}
