use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{DatasetDescriptor, DatasetReport, ManifestRow, SplitSpec, DATASET_YAML, LABELS_CSV};
use crate::utils::class_dir_name;

/// Create `<root>/<split_dir>/<class>` for every split and class.
///
/// Existing directories are left as they are, including class directories from
/// an earlier run with a different selection.
pub fn ensure_dirs(root: &Path, target_names: &[String], splits: &SplitSpec) -> Result<()> {
    for split in splits.entries() {
        for class_name in target_names {
            fs::create_dir_all(root.join(&split.target_dir).join(class_dir_name(class_name)))?;
        }
    }
    Ok(())
}

/// Write `labels.csv` (header `filename,label`) at the split root.
pub fn write_labels_csv(split_dir: &Path, rows: &[ManifestRow]) -> Result<PathBuf> {
    let path = split_dir.join(LABELS_CSV);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(b"filename,label\n")?;
    for row in rows {
        writeln!(writer, "{},{}", csv_field(&row.filename), csv_field(&row.label))?;
    }
    writer.flush()?;
    Ok(path)
}

// Quote a field only when it carries a delimiter, quote or line break
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Create the dataset.yaml file for YOLO classification training, replacing
/// any previous one. Returns its path.
pub fn write_dataset_yaml(
    root: &Path,
    target_names: &[String],
    splits: &SplitSpec,
) -> Result<PathBuf> {
    let descriptor = DatasetDescriptor {
        path: fs::canonicalize(root)?,
        train: splits.train.target_dir.clone(),
        val: splits.val.target_dir.clone(),
        names: target_names.to_vec(),
    };

    let path = root.join(DATASET_YAML);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(descriptor.to_yaml().as_bytes())?;
    writer.flush()?;

    info!("dataset.yaml written to: {}", path.display());
    info!("Class order: {:?}", target_names);
    Ok(path)
}

/// Write the run report as pretty JSON.
pub fn write_report(path: &Path, report: &DatasetReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    info!("Run report written to: {}", path.display());
    Ok(())
}
