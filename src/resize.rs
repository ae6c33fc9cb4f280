//! Bound the longest side of every image under a directory tree, mirroring the
//! tree into a destination. A file that fails to decode or save is logged and
//! skipped; the pass itself keeps going.

use image::imageops::FilterType;
use image::DynamicImage;
use jwalk::WalkDir;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::IMG_FORMATS;
use crate::utils::{create_progress_bar, extension_set, has_image_extension, save_image};

pub const DEFAULT_MAX_SIDE: u32 = 512;
pub const DEFAULT_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOptions {
    pub max_side: u32,
    /// Lowercase extensions without the leading dot
    pub extensions: HashSet<String>,
    pub quality: u8,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            extensions: extension_set(IMG_FORMATS),
            quality: DEFAULT_QUALITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ResizeStats {
    /// Files written to the destination
    pub processed: usize,
    /// Subset of `processed` that had to be scaled down
    pub resized: usize,
    pub failures: Vec<ResizeFailure>,
}

impl ResizeStats {
    pub fn print_summary(&self) {
        info!("=== Resize Summary ===");
        info!("Images written: {}", self.processed);
        info!("Images scaled down: {}", self.resized);
        if self.failures.is_empty() {
            info!("Failed images: 0");
        } else {
            warn!("Failed images: {}", self.failures.len());
        }
    }
}

/// Output dimensions for an image whose longest side must not exceed
/// `max_side`. Aspect ratio is kept up to rounding and no side drops below 1.
pub fn target_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let max_side = max_side.max(1);
    let longer = width.max(height);
    if longer <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longer as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (scaled(width), scaled(height))
}

/// Downscale with Lanczos3 when the longest side exceeds `max_side`; otherwise
/// return the image untouched.
pub fn resize_max_side(img: DynamicImage, max_side: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (new_width, new_height) = target_size(width, height, max_side);
    if (new_width, new_height) == (width, height) {
        img
    } else {
        img.resize_exact(new_width, new_height, FilterType::Lanczos3)
    }
}

/// Resize every recognized image under `src` into the same relative path under
/// `dst`. Only a missing or unreadable `src` root or a zero `max_side` is an
/// error.
pub fn resize_folder(src: &Path, dst: &Path, options: &ResizeOptions) -> Result<ResizeStats> {
    if options.max_side == 0 {
        return Err(Error::InvalidArgument(
            "max_side must be a positive integer".to_string(),
        ));
    }
    if !src.is_dir() {
        return Err(Error::NotADirectory(src.to_path_buf()));
    }
    let src = fs::canonicalize(src)?;
    let dst_abs = fs::canonicalize(dst).unwrap_or_else(|_| dst.to_path_buf());
    // Output from an earlier run may sit inside the source tree
    let skip_dst = dst_abs != src && dst_abs.starts_with(&src);

    let files: Vec<PathBuf> = WalkDir::new(&src)
        .sort(true)
        .skip_hidden(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| !(skip_dst && path.starts_with(&dst_abs)))
        .filter(|path| has_image_extension(path, &options.extensions))
        .collect();
    info!("Found {} images under {}", files.len(), src.display());

    let pb = create_progress_bar(files.len() as u64, "Resize");
    let mut stats = ResizeStats::default();
    for file in &files {
        let Ok(relative) = file.strip_prefix(&src) else {
            continue;
        };
        let out = dst.join(relative);
        match resize_file(file, &out, options) {
            Ok(resized) => {
                stats.processed += 1;
                if resized {
                    stats.resized += 1;
                }
                debug!("{}", out.display());
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                stats.failures.push(ResizeFailure {
                    path: file.clone(),
                    message: e.to_string(),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Resize complete");

    stats.print_summary();
    Ok(stats)
}

// Returns whether the image was scaled down
fn resize_file(src: &Path, out: &Path, options: &ResizeOptions) -> Result<bool> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let img = image::open(src)?;
    let original = (img.width(), img.height());
    let img = resize_max_side(img, options.max_side);
    save_image(&img, out, options.quality)?;
    Ok((img.width(), img.height()) != original)
}
