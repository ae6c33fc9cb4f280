mod common;

use std::fs;

use common::{file_names, write_image};
use yolocls::{
    prepare_dataset, BuildOptions, ClassSelection, Error, ImageFolderSource, NoopObserver,
    SampleImage, SampleSource, SplitSpec,
};

#[test]
fn test_taxonomy_from_class_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("train/dog/a.png"), 4, 4);
    write_image(&root.join("train/cat/a.png"), 4, 4);
    write_image(&root.join("validation/bird/a.png"), 4, 4);

    let source = ImageFolderSource::open(root).unwrap();

    assert_eq!(source.taxonomy().unwrap(), vec!["bird", "cat", "dog"]);
}

#[test]
fn test_taxonomy_from_classes_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("train/cat/a.png"), 4, 4);
    fs::write(root.join("classes.txt"), "dog\n  cat \n\nbird\n").unwrap();

    let source = ImageFolderSource::open(root).unwrap();

    assert_eq!(source.taxonomy().unwrap(), vec!["dog", "cat", "bird"]);
}

#[test]
fn test_samples_follow_sorted_path_order() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("train/dog/c.jpg"), 4, 4);
    write_image(&root.join("train/cat/b.png"), 4, 4);
    write_image(&root.join("train/cat/a.png"), 4, 4);
    fs::write(root.join("train/cat/notes.txt"), "not an image").unwrap();

    let source = ImageFolderSource::open(root).unwrap();
    let samples: Vec<_> = source
        .samples("train")
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let seen: Vec<(usize, String)> = samples
        .iter()
        .map(|sample| match &sample.image {
            SampleImage::File(path) => (
                sample.label,
                path.file_name().unwrap().to_string_lossy().into_owned(),
            ),
            SampleImage::Decoded(_) => panic!("folder samples are file backed"),
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            (0, "a.png".to_string()),
            (0, "b.png".to_string()),
            (1, "c.jpg".to_string()),
        ]
    );
}

#[test]
fn test_missing_split_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_image(&temp_dir.path().join("train/cat/a.png"), 4, 4);

    let source = ImageFolderSource::open(temp_dir.path()).unwrap();

    assert!(matches!(
        source.samples("validation"),
        Err(Error::MissingSplit(split)) if split == "validation"
    ));
}

#[test]
fn test_directory_outside_taxonomy_yields_unknown_label() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("train/cat/a.png"), 4, 4);
    write_image(&root.join("train/zebra/a.png"), 4, 4);
    fs::write(root.join("classes.txt"), "cat\n").unwrap();

    let source = ImageFolderSource::open(root).unwrap();
    let results: Vec<_> = source.samples("train").unwrap().collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(&results[1], Err(Error::UnknownLabel(name)) if name == "zebra"));
}

#[test]
fn test_open_requires_a_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope");

    assert!(matches!(
        ImageFolderSource::open(&missing),
        Err(Error::NotADirectory(_))
    ));
}

#[test]
fn test_prepare_dataset_from_image_folder() {
    let temp_dir = tempfile::tempdir().unwrap();
    let src = temp_dir.path().join("source");
    for name in ["a", "b", "c"] {
        write_image(&src.join(format!("train/pizza/{}.png", name)), 16, 12);
        write_image(&src.join(format!("train/sushi/{}.png", name)), 16, 12);
        write_image(&src.join(format!("validation/pizza/{}.png", name)), 16, 12);
    }
    write_image(&src.join("train/ramen/a.png"), 16, 12);
    fs::write(src.join("classes.txt"), "pizza\nramen\nsushi\n").unwrap();

    let source = ImageFolderSource::open(&src).unwrap();
    let selection: ClassSelection = [("sushi", 2), ("pizza", 0)].into_iter().collect();
    let out = temp_dir.path().join("out");

    let report = prepare_dataset(
        &source,
        &selection,
        &SplitSpec::new(2, 2),
        &out,
        &BuildOptions::default(),
        &mut NoopObserver,
    )
    .unwrap();

    assert_eq!(
        file_names(&out.join("train/pizza")),
        vec!["000000_00_pizza.jpg", "000001_00_pizza.jpg"]
    );
    assert_eq!(
        file_names(&out.join("train/sushi")),
        vec!["000004_02_sushi.jpg", "000005_02_sushi.jpg"]
    );
    assert!(!out.join("train/ramen").exists());
    assert_eq!(file_names(&out.join("val/pizza")).len(), 2);
    assert!(file_names(&out.join("val/sushi")).is_empty());

    let val = &report.splits[1];
    assert_eq!(val.saved("sushi"), Some(0));
    assert!(!val.is_complete());

    let yaml = fs::read_to_string(out.join("dataset.yaml")).unwrap();
    assert!(yaml.contains("names:\n  - sushi\n  - pizza\n"));
}
