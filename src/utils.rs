use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Create a spinner for streams whose length is not known up front
pub fn create_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template(&format!(
        "{{spinner:.green}} [{}] [{{elapsed_precise}}] {{pos}} saved {{msg}}",
        label
    )));
    pb.enable_steady_tick(100);
    pb
}

/// Normalize a list of extensions into a lowercase lookup set ("JPG", ".jpg" -> "jpg")
pub fn extension_set<S: AsRef<str>>(exts: &[S]) -> HashSet<String> {
    exts.iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Case-insensitive extension check against a set built by `extension_set`
pub fn has_image_extension(path: &Path, exts: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| exts.contains(&ext.to_lowercase()))
}

/// Filesystem-safe directory name for a class
pub fn class_dir_name(class_name: &str) -> String {
    sanitize_filename::sanitize(class_name)
}

/// Save an image in the format implied by the path extension. JPEG output is
/// converted to RGB and encoded at `quality`; other formats ignore it.
pub fn save_image(img: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    if format == ImageFormat::Jpeg {
        let mut writer = BufWriter::new(File::create(path)?);
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
        writer.flush()?;
    } else {
        img.save_with_format(path, format)?;
    }
    Ok(())
}
