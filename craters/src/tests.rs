//! End-to-end behaviour of the crater pipeline on synthetic scenes.

use std::f64::consts::PI;

use image::{DynamicImage, Rgb};

use crate::test_utils::{blank, crater_scene};
use crate::{
    extract_contours, segment, CraterDetector, DetectorConfig, Error, MatchConfig, MatchStrategy,
    NullReporter, SegmentationConfig,
};

fn detector() -> CraterDetector<NullReporter> {
    CraterDetector::new(DetectorConfig::default())
        .unwrap()
        .with_reporter(NullReporter)
}

fn assert_angle(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected + PI).rem_euclid(2.0 * PI) - PI;
    assert!(
        diff.abs() <= tolerance,
        "angle {actual} differs from {expected} by {diff}"
    );
}

#[test]
fn overlapping_lit_and_shadowed_disks_form_one_crater() {
    let image = crater_scene(100, 100, (30, 30), (40, 40), 20);
    let detection = detector().detect_gray(&image).unwrap();

    assert_eq!(detection.field.len(), 1);
    let crater = &detection.field.craters()[0];
    let radius = crater.radius();
    assert!(radius > 20.0 && radius < 40.0, "radius {radius}");
    assert_angle(crater.sun_angle(), (30.0f64 - 40.0).atan2(30.0 - 40.0), 0.1);
    assert!((crater.sun_angle_degrees() + 135.0).abs() < 6.0);

    let stats = detection.field.stats();
    assert_eq!(stats.num_craters, 1);
    assert_eq!((stats.width, stats.height), (100, 100));
    assert_eq!(stats.mean_rad, radius);
}

#[test]
fn separated_pair_yields_one_candidate_with_all_points() {
    let image = crater_scene(100, 100, (25, 25), (70, 70), 12);
    let segmentation =
        segment(&image, &SegmentationConfig::default(), &NullReporter).unwrap();
    let bright = extract_contours(&segmentation.bright, "bright", &NullReporter);
    let dark = extract_contours(&segmentation.dark, "dark", &NullReporter);
    assert_eq!(bright.len(), 1);
    assert_eq!(dark.len(), 1);

    let detection = detector().detect_gray(&image).unwrap();
    assert_eq!(detection.field.len(), 1);
    let candidate = detection.field.craters()[0].candidate();
    assert_eq!(
        candidate.combined().len(),
        bright.contours[0].len() + dark.contours[0].len()
    );
    assert_eq!(candidate.high(), &bright.contours[0]);
    assert_eq!(candidate.low(), &dark.contours[0]);
    assert_angle(detection.field.craters()[0].sun_angle(), -0.75 * PI, 0.05);
}

#[test]
fn sun_angle_ignores_translation() {
    let here = crater_scene(100, 100, (30, 30), (40, 40), 20);
    let there = crater_scene(100, 100, (45, 40), (55, 50), 20);

    let a = detector().detect_gray(&here).unwrap();
    let b = detector().detect_gray(&there).unwrap();
    assert_eq!(a.field.len(), 1);
    assert_eq!(b.field.len(), 1);
    assert_angle(
        b.field.craters()[0].sun_angle(),
        a.field.craters()[0].sun_angle(),
        0.05,
    );
}

#[test]
fn uniform_image_fails_with_empty_peak_set() {
    let result = detector().detect_gray(&blank(64, 64, 90));
    assert!(matches!(result, Err(Error::EmptyPeakSet)));
}

#[test]
fn rgb_input_is_accepted_and_rgba_rejected() {
    let gray = crater_scene(100, 100, (25, 25), (70, 70), 12);
    let rgb = DynamicImage::ImageLuma8(gray.clone()).to_rgb8();
    let detection = detector().detect(&DynamicImage::ImageRgb8(rgb)).unwrap();
    assert_eq!(detection.field.len(), 1);

    let rgba = DynamicImage::ImageLuma8(gray).to_rgba8();
    assert!(matches!(
        detector().detect(&DynamicImage::ImageRgba8(rgba)),
        Err(Error::UnsupportedImageShape { channels: 4 })
    ));
}

#[test]
fn annotation_marks_contours_and_match() {
    let image = crater_scene(100, 100, (25, 25), (70, 70), 12);
    let detection = detector().detect_gray(&image).unwrap();
    let annotated = &detection.annotated;

    assert_eq!(annotated.dimensions(), (100, 100));
    // Crater outlines are drawn last among contours, over both sides.
    assert!(annotated.pixels().any(|p| *p == Rgb([0, 255, 0])));
    // The match line crosses the background between the two disks.
    let black_near_midpoint = (46..=50)
        .flat_map(|y| (46..=50).map(move |x| (x, y)))
        .any(|(x, y)| *annotated.get_pixel(x, y) == Rgb([0, 0, 0]));
    assert!(black_near_midpoint);
    // Untouched background stays gray.
    assert_eq!(*annotated.get_pixel(95, 5), Rgb([128, 128, 128]));

    annotated
        .save(common::test_utils::test_output_path("annotated_crater_pair.png"))
        .unwrap();
}

#[test]
fn one_to_one_strategy_runs_end_to_end() {
    let config = DetectorConfig {
        matching: MatchConfig {
            strategy: MatchStrategy::OneToOne,
        },
        ..Default::default()
    };
    let detector = CraterDetector::new(config)
        .unwrap()
        .with_reporter(NullReporter);
    let detection = detector
        .detect_gray(&crater_scene(100, 100, (30, 30), (40, 40), 20))
        .unwrap();
    assert_eq!(detection.field.len(), 1);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = DetectorConfig {
        segmentation: SegmentationConfig {
            low_percentile: 0.9,
            high_percentile: 0.1,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        CraterDetector::new(config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn blank_image_has_no_circles() {
    let circles = detector()
        .find_circles(&DynamicImage::ImageLuma8(blank(80, 60, 200)))
        .unwrap();
    assert!(circles.is_empty());
}
