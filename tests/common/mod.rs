#![allow(dead_code)]

use image::{DynamicImage, RgbImage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use yolocls::source::SampleIter;
use yolocls::{Error, Result, Sample, SampleImage, SampleSource};

pub const STUB_WIDTH: u32 = 8;
pub const STUB_HEIGHT: u32 = 6;

/// In-memory source that records how many samples were pulled per split.
pub struct StubSource {
    taxonomy: Vec<String>,
    splits: HashMap<String, Vec<(usize, SampleImage)>>,
    pulls: RefCell<HashMap<String, usize>>,
}

impl StubSource {
    pub fn new(taxonomy: Vec<String>) -> Self {
        Self {
            taxonomy,
            splits: HashMap::new(),
            pulls: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_split(self, split: &str, labels: &[usize]) -> Self {
        let samples = labels
            .iter()
            .map(|&label| (label, SampleImage::Decoded(stub_image())))
            .collect();
        self.with_samples(split, samples)
    }

    pub fn with_samples(mut self, split: &str, samples: Vec<(usize, SampleImage)>) -> Self {
        self.splits.insert(split.to_string(), samples);
        self
    }

    pub fn pulls(&self, split: &str) -> usize {
        self.pulls.borrow().get(split).copied().unwrap_or(0)
    }
}

impl SampleSource for StubSource {
    fn taxonomy(&self) -> Result<Vec<String>> {
        Ok(self.taxonomy.clone())
    }

    fn samples<'a>(&'a self, split: &str) -> Result<SampleIter<'a>> {
        let samples = self
            .splits
            .get(split)
            .ok_or_else(|| Error::MissingSplit(split.to_string()))?;
        let split = split.to_string();
        Ok(Box::new(samples.iter().map(move |(label, image)| {
            *self.pulls.borrow_mut().entry(split.clone()).or_insert(0) += 1;
            Ok(Sample {
                label: *label,
                image: image.clone(),
            })
        })))
    }
}

pub fn stub_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        STUB_WIDTH,
        STUB_HEIGHT,
        image::Rgb([200, 120, 40]),
    ))
}

/// `label_0`, `label_1`, ...
pub fn numbered_taxonomy(len: usize) -> Vec<String> {
    (0..len).map(|id| format!("label_{}", id)).collect()
}

/// 101 labels with `pizza` at 77 and `sushi` at 91.
pub fn food_taxonomy() -> Vec<String> {
    let mut taxonomy = numbered_taxonomy(101);
    taxonomy[77] = "pizza".to_string();
    taxonomy[91] = "sushi".to_string();
    taxonomy
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]))
        .save(path)
        .unwrap();
}
