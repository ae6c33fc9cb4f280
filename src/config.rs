use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

use crate::dataset::BuildOptions;
use crate::error::{Error, Result};
use crate::resize::{ResizeOptions, DEFAULT_MAX_SIDE, DEFAULT_QUALITY};
use crate::types::{ClassEntry, ClassSelection, SplitEntry, SplitSpec, IMG_FORMATS};
use crate::utils::extension_set;

/// Command-line arguments for building a YOLO classification dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root of the labeled source, laid out as <split>/<class>/<image>
    #[arg(short = 's', long = "source_dir")]
    pub source_dir: PathBuf,

    /// Output root of the YOLO classification dataset
    #[arg(short = 'o', long = "output_dir", default_value = "dataset")]
    pub output_dir: PathBuf,

    /// Ordered class selection as name=id pairs, e.g. pizza=76,sushi=95
    #[arg(long = "classes", use_value_delimiter = true, value_parser = parse_class_pair)]
    pub classes: Vec<(String, usize)>,

    /// JSON file with an ordered [{"name": .., "id": ..}] class selection
    #[arg(long = "classes_file")]
    pub classes_file: Option<PathBuf>,

    /// Images to keep per class in the train split
    #[arg(long = "train_per_class", default_value_t = 100)]
    pub train_per_class: usize,

    /// Images to keep per class in the validation split
    #[arg(long = "val_per_class", default_value_t = 25)]
    pub val_per_class: usize,

    /// Source split read for training images
    #[arg(long = "train_split", default_value = "train")]
    pub train_split: String,

    /// Source split read for validation images
    #[arg(long = "val_split", default_value = "validation")]
    pub val_split: String,

    /// Output directory name of the train split
    #[arg(long = "train_dir", default_value = "train")]
    pub train_dir: String,

    /// Output directory name of the validation split
    #[arg(long = "val_dir", default_value = "val")]
    pub val_dir: String,

    /// Write labels.csv (filename,label) at each split root
    #[arg(long = "csv")]
    pub csv: bool,

    /// JPEG quality of saved samples
    #[arg(long = "jpeg_quality", default_value_t = DEFAULT_QUALITY, value_parser = validate_quality)]
    pub jpeg_quality: u8,

    /// Write a JSON run report to this path
    #[arg(long = "report")]
    pub report: Option<PathBuf>,
}

impl Args {
    /// Classes from `--classes_file` first, then `--classes`.
    pub fn class_selection(&self) -> Result<ClassSelection> {
        let mut selection = ClassSelection::new();
        if let Some(path) = &self.classes_file {
            let entries: Vec<ClassEntry> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
            for entry in entries {
                selection.insert(entry.name, entry.id);
            }
        }
        for (name, id) in &self.classes {
            selection.insert(name.clone(), *id);
        }
        if selection.is_empty() {
            return Err(Error::InvalidArgument(
                "no classes selected, pass --classes or --classes_file".to_string(),
            ));
        }
        Ok(selection)
    }

    pub fn split_spec(&self) -> SplitSpec {
        SplitSpec {
            train: SplitEntry::new(&self.train_split, &self.train_dir, self.train_per_class),
            val: SplitEntry::new(&self.val_split, &self.val_dir, self.val_per_class),
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            make_csv: self.csv,
            jpeg_quality: self.jpeg_quality,
        }
    }
}

/// Command-line arguments for bounding the longest side of images in a tree.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct ResizeArgs {
    /// Directory scanned recursively for images
    #[arg(long = "src")]
    pub src: PathBuf,

    /// Destination root; the source folder structure is mirrored here
    #[arg(long = "dst")]
    pub dst: PathBuf,

    /// Maximum length of the longest image side
    #[arg(long = "max_side", default_value_t = DEFAULT_MAX_SIDE, value_parser = validate_max_side)]
    pub max_side: u32,

    /// Image extensions to process (case-insensitive)
    #[arg(long = "exts", use_value_delimiter = true, default_values_t = IMG_FORMATS.iter().map(|ext| ext.to_string()).collect::<Vec<_>>())]
    pub exts: Vec<String>,

    /// Output quality for lossy formats
    #[arg(long = "quality", default_value_t = DEFAULT_QUALITY, value_parser = validate_quality)]
    pub quality: u8,
}

impl ResizeArgs {
    pub fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            max_side: self.max_side,
            extensions: extension_set(self.exts.as_slice()),
            quality: self.quality,
        }
    }
}

// Parse a `name=id` class pair
pub fn parse_class_pair(s: &str) -> std::result::Result<(String, usize), String> {
    let (name, id) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=ID, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing class name in '{}'", s));
    }
    let id = usize::from_str(id.trim()).map_err(|_| format!("invalid class id in '{}'", s))?;
    Ok((name.to_string(), id))
}

// Validate that the quality is between 1 and 100
pub fn validate_quality(s: &str) -> std::result::Result<u8, String> {
    match u8::from_str(s) {
        Ok(val) if (1..=100).contains(&val) => Ok(val),
        _ => Err("QUALITY must be between 1 and 100".to_string()),
    }
}

// Validate that the side length is positive
pub fn validate_max_side(s: &str) -> std::result::Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("MAX_SIDE must be a positive integer".to_string()),
    }
}
