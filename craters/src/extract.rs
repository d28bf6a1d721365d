use image::GrayImage;

use crate::report::Reporter;
use crate::vision::{find_contours, Contour};

/// Contours of one mask with their hierarchy.
///
/// `parents[i]` is the index of the border enclosing `contours[i]`, `None`
/// at the top level. Matching ignores the hierarchy.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
    pub parents: Vec<Option<usize>>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Indices of the contours with no enclosing border.
    pub fn top_level(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(index, _)| index)
    }
}

pub fn extract_contours(mask: &GrayImage, label: &str, reporter: &dyn Reporter) -> ContourSet {
    let (contours, parents) = find_contours(mask);
    let total_points: usize = contours.iter().map(Contour::len).sum();
    reporter.debug(format_args!(
        "{label} mask: {} contours, {total_points} boundary points",
        contours.len()
    ));
    ContourSet { contours, parents }
}
