use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::save_image;

// Image extensions recognized by default, matched case-insensitively
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

pub const DATASET_YAML: &str = "dataset.yaml";
pub const LABELS_CSV: &str = "labels.csv";

/// One selected class: a human-chosen name and its id in the source taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub id: usize,
}

/// Ordered name -> id selection. The order becomes the class index order of the
/// emitted dataset, so it is kept exactly as inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassSelection {
    entries: Vec<ClassEntry>,
}

impl ClassSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a class. Re-inserting an existing name keeps its
    /// original position and replaces the id.
    pub fn insert(&mut self, name: impl Into<String>, id: usize) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.id = id,
            None => self.entries.push(ClassEntry { name, id }),
        }
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for ClassSelection {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut selection = ClassSelection::new();
        for (name, id) in iter {
            selection.insert(name, id);
        }
        selection
    }
}

// One source split and where/how much of it lands in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub source_split: String,
    pub target_dir: String,
    pub quota: usize,
}

impl SplitEntry {
    pub fn new(source_split: impl Into<String>, target_dir: impl Into<String>, quota: usize) -> Self {
        Self {
            source_split: source_split.into(),
            target_dir: target_dir.into(),
            quota,
        }
    }
}

/// The train and validation splits, always built in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    pub train: SplitEntry,
    pub val: SplitEntry,
}

impl SplitSpec {
    pub fn new(train_quota: usize, val_quota: usize) -> Self {
        Self {
            train: SplitEntry::new("train", "train", train_quota),
            val: SplitEntry::new("validation", "val", val_quota),
        }
    }

    pub fn entries(&self) -> [&SplitEntry; 2] {
        [&self.train, &self.val]
    }
}

/// Image payload of a sample. File-backed payloads are only decoded when the
/// sample is actually persisted.
#[derive(Debug, Clone)]
pub enum SampleImage {
    File(PathBuf),
    Decoded(DynamicImage),
}

impl SampleImage {
    /// Encode the image as JPEG at `path`.
    pub fn save_jpeg(&self, path: &Path, quality: u8) -> Result<()> {
        match self {
            SampleImage::File(src) => save_image(&image::open(src)?, path, quality),
            SampleImage::Decoded(img) => save_image(img, path, quality),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sample {
    pub label: usize,
    pub image: SampleImage,
}

// A labels.csv row: path relative to the split dir, and the class name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub filename: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub name: String,
    pub saved: usize,
}

/// Outcome of one split build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub source_split: String,
    pub target_dir: String,
    pub quota: usize,
    pub counts: Vec<ClassCount>,
    /// Samples pulled from the source, skipped ones included.
    pub pulled: usize,
    pub manifest: Option<PathBuf>,
}

impl SplitReport {
    pub fn total_saved(&self) -> usize {
        self.counts.iter().map(|count| count.saved).sum()
    }

    pub fn under_quota(&self) -> Vec<&ClassCount> {
        self.counts
            .iter()
            .filter(|count| count.saved < self.quota)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.under_quota().is_empty()
    }

    pub fn saved(&self, class_name: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|count| count.name == class_name)
            .map(|count| count.saved)
    }

    pub fn print_summary(&self) {
        let counts: Vec<String> = self
            .counts
            .iter()
            .map(|count| format!("{}: {}", count.name, count.saved))
            .collect();
        log::info!(
            "[{}] saved counts: {{{}}} ({} samples pulled)",
            self.source_split,
            counts.join(", "),
            self.pulled
        );

        for count in self.under_quota() {
            log::warn!(
                "[{}] class '{}' is under quota: {}/{}",
                self.source_split,
                count.name,
                count.saved,
                self.quota
            );
        }
    }
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub dataset_yaml: PathBuf,
    pub splits: Vec<SplitReport>,
}

/// Top-level description consumed by YOLO classification training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub path: PathBuf,
    pub train: String,
    pub val: String,
    pub names: Vec<String>,
}

impl DatasetDescriptor {
    pub fn to_yaml(&self) -> String {
        let mut yaml = String::from("# YOLO classification dataset\n");
        yaml.push_str(&format!(
            "path: {}\ntrain: {}\nval: {}\nnames:\n",
            yaml_scalar(&self.path.to_string_lossy()),
            yaml_scalar(&self.train),
            yaml_scalar(&self.val)
        ));
        for name in &self.names {
            yaml.push_str(&format!("  - {}\n", yaml_scalar(name)));
        }
        yaml
    }
}

// Single-quote a scalar when plain YAML would misread it
fn yaml_scalar(raw: &str) -> String {
    const SPECIAL_START: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];
    const RESERVED: &[&str] = &[
        "~", "null", "true", "false", "yes", "no", "on", "off", "y", "n", ".inf", "-.inf",
        "+.inf", ".nan",
    ];
    let needs_quotes = raw.is_empty()
        || raw.trim() != raw
        || RESERVED.contains(&raw.to_lowercase().as_str())
        || raw.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '.')
        || raw.parse::<f64>().is_ok()
        || raw.starts_with(SPECIAL_START)
        || raw.contains(": ")
        || raw.contains(" #")
        || raw.contains('\n');
    if needs_quotes {
        format!("'{}'", raw.replace('\'', "''"))
    } else {
        raw.to_string()
    }
}
