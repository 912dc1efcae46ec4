//! Content-fit policy: how the child's natural size maps onto the container.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Baseline scaling applied whenever the child or container size changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFit {
    /// Scale uniformly so the whole child is visible.
    #[default]
    Fit,
    /// Scale uniformly so the child covers the whole container.
    Crop,
    /// Match the container width.
    FillWidth,
    /// Match the container height.
    FillHeight,
    /// Keep the child's natural size.
    None,
}

impl fmt::Display for ContentFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentFit::Fit => "fit",
            ContentFit::Crop => "crop",
            ContentFit::FillWidth => "fill_width",
            ContentFit::FillHeight => "fill_height",
            ContentFit::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for ContentFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(ContentFit::Fit),
            "crop" => Ok(ContentFit::Crop),
            "fill_width" | "fillwidth" => Ok(ContentFit::FillWidth),
            "fill_height" | "fillheight" => Ok(ContentFit::FillHeight),
            "none" => Ok(ContentFit::None),
            other => Err(format!(
                "invalid content fit '{other}'; expected fit, crop, fill_width, fill_height or none"
            )),
        }
    }
}

/// Resolve the baseline scale for `fit`.
///
/// Returns `None` while either size is still unknown so callers keep their
/// previous scale instead of applying an infinite or NaN ratio.
///
/// # Example
///
/// ```ignore
/// // Portrait 300x400 image in a 300x300 container
/// let scale = resolve_initial_scale(ContentFit::Fit, Size::new(300, 300), Size::new(300, 400));
/// assert_eq!(scale, Some(0.75));
/// ```
pub fn resolve_initial_scale(fit: ContentFit, container: Size, child: Size) -> Option<f32> {
    if container.is_empty() || child.is_empty() {
        return None;
    }

    let sx = container.width as f32 / child.width as f32;
    let sy = container.height as f32 / child.height as f32;

    let scale = match fit {
        ContentFit::Crop => sx.max(sy),
        ContentFit::Fit => sx.min(sy),
        ContentFit::FillWidth => sx,
        ContentFit::FillHeight => sy,
        ContentFit::None => 1.0,
    };
    Some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size {
        width: 300,
        height: 300,
    };
    const PORTRAIT: Size = Size {
        width: 300,
        height: 400,
    };

    #[test]
    fn test_fit_uses_smaller_ratio() {
        assert_eq!(
            resolve_initial_scale(ContentFit::Fit, CONTAINER, PORTRAIT),
            Some(0.75)
        );
    }

    #[test]
    fn test_crop_uses_larger_ratio() {
        assert_eq!(
            resolve_initial_scale(ContentFit::Crop, CONTAINER, PORTRAIT),
            Some(1.0)
        );
    }

    #[test]
    fn test_fill_axes() {
        let child = Size::new(600, 150);
        assert_eq!(
            resolve_initial_scale(ContentFit::FillWidth, CONTAINER, child),
            Some(0.5)
        );
        assert_eq!(
            resolve_initial_scale(ContentFit::FillHeight, CONTAINER, child),
            Some(2.0)
        );
    }

    #[test]
    fn test_none_is_identity() {
        assert_eq!(
            resolve_initial_scale(ContentFit::None, CONTAINER, PORTRAIT),
            Some(1.0)
        );
    }

    #[test]
    fn test_unknown_sizes_not_ready() {
        assert_eq!(
            resolve_initial_scale(ContentFit::Fit, CONTAINER, Size::ZERO),
            None
        );
        assert_eq!(
            resolve_initial_scale(ContentFit::Crop, Size::new(0, 300), PORTRAIT),
            None
        );
    }

    #[test]
    fn test_parse_and_display() {
        for fit in [
            ContentFit::Fit,
            ContentFit::Crop,
            ContentFit::FillWidth,
            ContentFit::FillHeight,
            ContentFit::None,
        ] {
            assert_eq!(fit.to_string().parse::<ContentFit>(), Ok(fit));
        }
        assert_eq!(" Crop ".parse::<ContentFit>(), Ok(ContentFit::Crop));
        assert!("stretch".parse::<ContentFit>().is_err());
    }
}
