//! The bright/dark crater pipeline and the multi-scale circle entry point.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::extract::{extract_contours, ContourSet};
use crate::matcher::{match_contours, MatchOutcome};
use crate::model::{Crater, CraterField};
use crate::multiscale::{self, DetectedCircle};
use crate::report::{LogReporter, Reporter};
use crate::segment::{segment, ThresholdBounds};
use crate::vision::{draw_contour_mut, draw_segment_mut, grayscale, min_enclosing_circle};

const DARK_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BRIGHT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const CRATER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const MATCH_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Result of [`CraterDetector::detect`].
#[derive(Debug, Clone)]
pub struct Detection {
    /// The grayscale input with dark contours in red, bright contours in
    /// blue, crater outlines in green and a black line per match.
    pub annotated: RgbImage,
    pub field: CraterField,
    /// Thresholds the masks were cut at.
    pub bounds: ThresholdBounds,
}

/// Runs the detection pipelines with one validated configuration.
///
/// ```rust,ignore
/// use craters::{CraterDetector, DetectorConfig, NullReporter};
///
/// let detector = CraterDetector::new(DetectorConfig::default())?.with_reporter(NullReporter);
/// let detection = detector.detect(&image::open("moon.png")?)?;
/// println!("{} craters", detection.field.len());
/// ```
#[derive(Debug, Clone)]
pub struct CraterDetector<R: Reporter = LogReporter> {
    config: DetectorConfig,
    reporter: R,
}

impl CraterDetector<LogReporter> {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reporter: LogReporter,
        })
    }
}

impl Default for CraterDetector<LogReporter> {
    fn default() -> Self {
        Self {
            config: DetectorConfig::default(),
            reporter: LogReporter,
        }
    }
}

impl<R: Reporter> CraterDetector<R> {
    pub fn with_reporter<S: Reporter>(self, reporter: S) -> CraterDetector<S> {
        CraterDetector {
            config: self.config,
            reporter,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Detects craters in a one- or three-channel image.
    pub fn detect(&self, image: &DynamicImage) -> Result<Detection> {
        let gray = grayscale(image)?;
        self.detect_gray(&gray)
    }

    pub fn detect_gray(&self, image: &GrayImage) -> Result<Detection> {
        let reporter: &dyn Reporter = &self.reporter;
        let (width, height) = image.dimensions();
        reporter.debug(format_args!("detecting craters in {width}x{height} image"));

        let segmentation = segment(image, &self.config.segmentation, reporter)?;
        let bright = extract_contours(&segmentation.bright, "bright", reporter);
        let dark = extract_contours(&segmentation.dark, "dark", reporter);

        let outcome = match_contours(
            &bright.contours,
            &dark.contours,
            &self.config.matching,
            reporter,
        )?;
        let annotated = annotate(image, &bright, &dark, &outcome);

        let craters = outcome.candidates.into_iter().map(Crater::new).collect();
        let field = CraterField::new(width, height, craters);
        reporter.info(format_args!("found {} craters", field.len()));

        Ok(Detection {
            annotated,
            field,
            bounds: segmentation.bounds,
        })
    }

    /// Multi-scale Hough circles of a one- or three-channel image.
    pub fn find_circles(&self, image: &DynamicImage) -> Result<Vec<DetectedCircle>> {
        let gray = grayscale(image)?;
        multiscale::find_circles(&gray, &self.config.circles, &self.reporter)
    }
}

/// Detects craters with the default configuration, reporting through `log`.
pub fn detect(image: &DynamicImage) -> Result<Detection> {
    CraterDetector::<LogReporter>::default().detect(image)
}

/// Multi-scale circle detection with the default configuration.
pub fn find_circles(image: &DynamicImage) -> Result<Vec<DetectedCircle>> {
    CraterDetector::<LogReporter>::default().find_circles(image)
}

fn annotate(
    image: &GrayImage,
    bright: &ContourSet,
    dark: &ContourSet,
    outcome: &MatchOutcome,
) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(image.clone()).to_rgb8();

    for contour in &dark.contours {
        draw_contour_mut(&mut canvas, contour.points(), DARK_COLOR);
    }
    for contour in &bright.contours {
        draw_contour_mut(&mut canvas, contour.points(), BRIGHT_COLOR);
    }
    for candidate in &outcome.candidates {
        draw_contour_mut(&mut canvas, candidate.combined().points(), CRATER_COLOR);
    }
    for candidate in &outcome.candidates {
        let from = min_enclosing_circle(candidate.high().points()).center.round();
        let to = min_enclosing_circle(candidate.low().points()).center.round();
        draw_segment_mut(&mut canvas, from, to, MATCH_COLOR);
    }
    canvas
}
