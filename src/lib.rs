//! Class-balanced YOLO classification dataset builder
//!
//! This library streams a labeled image source into the YOLO classification
//! layout (`<split>/<class>/<image>.jpg` plus `dataset.yaml`), keeping at most a
//! fixed number of images per class and split. It also provides a pass that
//! bounds the longest side of every image in a directory tree.

pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod labels;
pub mod observer;
pub mod resize;
pub mod source;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, ResizeArgs};
pub use dataset::{build_split, prepare_dataset, BuildOptions};
pub use error::{Error, Result};
pub use io::{ensure_dirs, write_dataset_yaml, write_labels_csv, write_report};
pub use labels::{map_labels, LabelIndex};
pub use observer::{BuildObserver, LogObserver, NoopObserver};
pub use resize::{resize_folder, resize_max_side, ResizeOptions, ResizeStats};
pub use source::{ImageFolderSource, SampleSource};
pub use types::{
    ClassSelection, DatasetDescriptor, DatasetReport, Sample, SampleImage, SplitEntry,
    SplitReport, SplitSpec,
};
