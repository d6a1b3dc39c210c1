//! End-to-end pipeline tests with a stub classifier.

use jelly_core::{
    Classifier, Error, GalleryAssets, Result, classify_batch, render_narrative, scan_folder,
    tabular_to_writer, write_narrative, write_tabular,
};
use ndarray::Array4;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct FixedClassifier(Vec<f32>);

impl Classifier for FixedClassifier {
    fn predict(&self, _input: &Array4<f32>) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn predict(&self, _input: &Array4<f32>) -> Result<Vec<f32>> {
        // Artifact answering outside its contract.
        Ok(vec![1.0; 11])
    }
}

fn write_test_png(path: &Path) {
    let img = image::RgbImage::from_pixel(12, 9, image::Rgb([30, 120, 200]));
    img.save(path).unwrap();
}

#[test]
fn folder_to_exports_round_trip() -> Result<()> {
    let dir = tempdir()?;
    for name in ["one.png", "two.png"] {
        write_test_png(&dir.path().join(name));
    }

    let files = scan_folder(dir.path())?;
    assert_eq!(files.len(), 2);

    let clf = FixedClassifier(vec![0.05, 0.7, 0.1, 0.05, 0.05, 0.05]);
    let batch = classify_batch(Some(&clf), &files);
    assert_eq!(batch.items.len(), 2);
    assert!(batch.skipped.is_empty());

    // Exports are order-independent views over the same batch; generate the
    // narrative first, then the table, and check neither disturbed the other.
    let html_path = dir.path().join("report.html");
    write_narrative(&batch, &GalleryAssets::default(), &html_path)?;
    let csv_path = dir.path().join("report.csv");
    write_tabular(&batch, &csv_path)?;

    let html = std::fs::read_to_string(&html_path)?;
    assert!(html.contains("Barrel Jellyfish"));
    assert!(html.contains("data:image/png;base64,"));

    let mut rdr = csv::Reader::from_path(&csv_path)?;
    let rows: Vec<_> = rdr.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "Barrel Jellyfish");
    assert_eq!(&rows[0][2], "70.0");
    Ok(())
}

#[test]
fn degraded_mode_yields_empty_batch_and_no_exports() -> Result<()> {
    let dir = tempdir()?;
    let files: Vec<PathBuf> = ["a.png", "b.png", "c.png"]
        .iter()
        .map(|name| {
            let p = dir.path().join(name);
            write_test_png(&p);
            p
        })
        .collect();

    let batch = classify_batch(None, &files);
    assert!(batch.is_empty());
    assert_eq!(batch.skipped.len(), 3);

    let err = write_tabular(&batch, dir.path().join("out.csv")).unwrap_err();
    assert!(matches!(err, Error::EmptyBatch));
    let err = render_narrative(&batch, &GalleryAssets::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyBatch));
    Ok(())
}

#[test]
fn off_contract_classifier_skips_images_instead_of_corrupting_rows() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("a.png");
    write_test_png(&file);

    let batch = classify_batch(Some(&BrokenClassifier), &[file]);
    assert!(batch.is_empty());
    assert_eq!(batch.skipped.len(), 1);
    assert!(batch.skipped[0].reason.contains("expected 6"));
    Ok(())
}

#[test]
fn csv_writer_variant_matches_file_variant() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("a.png");
    write_test_png(&file);

    let clf = FixedClassifier(vec![0.9, 0.02, 0.02, 0.02, 0.02, 0.02]);
    let batch = classify_batch(Some(&clf), &[file]);

    let mut via_writer = Vec::new();
    tabular_to_writer(&batch, &mut via_writer)?;
    let path = dir.path().join("out.csv");
    write_tabular(&batch, &path)?;
    let via_file = std::fs::read(&path)?;
    assert_eq!(via_writer, via_file);
    Ok(())
}

#[test]
fn reports_do_not_mutate_the_batch() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("a.png");
    write_test_png(&file);

    let clf = FixedClassifier(vec![0.1, 0.05, 0.05, 0.6, 0.1, 0.1]);
    let batch = classify_batch(Some(&clf), &[file]);
    let counts_before = batch.tier_counts();

    let _ = render_narrative(&batch, &GalleryAssets::default())?;
    let mut sink = Vec::new();
    tabular_to_writer(&batch, &mut sink)?;

    assert_eq!(batch.tier_counts(), counts_before);
    assert_eq!(batch.items.len(), 1);
    Ok(())
}

#[test]
fn empty_input_list_is_an_empty_batch() {
    let clf = FixedClassifier(vec![0.9, 0.02, 0.02, 0.02, 0.02, 0.02]);
    let batch = classify_batch(Some(&clf), &[]);
    assert!(batch.is_empty());
    assert!(batch.skipped.is_empty());
    assert_eq!(batch.tier_counts(), jelly_core::TierCounts::default());
}
