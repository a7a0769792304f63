//! Per render configuration.

use crate::{
    color::{ColorSpace, ColorSpaceKind, Rgba},
    flatten::{flatten, Flattener},
    path::Path,
};

/// The options a renderer passes along with each path.
///
/// There is no global default; construct one per rendering context.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderSettings {
    /// Device pixels per path unit.
    pub scale: f64,
    /// The space colors are blended in.
    pub color_space: ColorSpaceKind,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            scale: 1.0,
            color_space: ColorSpaceKind::default(),
        }
    }
}

impl RenderSettings {
    pub fn new(scale: f64, color_space: ColorSpaceKind) -> Self {
        RenderSettings { scale, color_space }
    }

    /// Flatten `path` at these settings' scale.
    pub fn flatten<F: Flattener + ?Sized>(&self, path: &Path, flattener: &mut F) {
        flatten(path, flattener, self.scale)
    }

    pub fn to_linear(&self, color: Rgba) -> Rgba {
        self.color_space.to_linear(color)
    }

    pub fn from_linear(&self, color: Rgba) -> Rgba {
        self.color_space.from_linear(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegmentedPath;

    #[test]
    fn defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.scale, 1.0);
        assert_eq!(settings.color_space, ColorSpaceKind::Linear);
        let color = Rgba::new(1, 2, 3, 4);
        assert_eq!(settings.to_linear(color), color);
    }

    #[test]
    fn scale_controls_precision() {
        let path = crate::shapes::circle(100.0);
        let count = |scale| {
            let mut points = SegmentedPath::default();
            RenderSettings::new(scale, ColorSpaceKind::Srgb).flatten(&path, &mut points);
            points.points.len()
        };
        assert!(count(4.0) > count(1.0));
    }

    #[test]
    fn independent_settings() {
        let linear = RenderSettings::default();
        let srgb = RenderSettings::new(1.0, ColorSpaceKind::Srgb);
        let gray = Rgba::new(128, 128, 128, 255);
        assert_eq!(linear.to_linear(gray), gray);
        assert_ne!(srgb.to_linear(gray), gray);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde() {
        let settings = RenderSettings::new(2.0, ColorSpaceKind::Gamma(2.2));
        let json = serde_json::to_string(&settings).unwrap();
        let back: RenderSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
        let partial: RenderSettings = serde_json::from_str(r#"{"scale": 3.0}"#).unwrap();
        assert_eq!(partial.color_space, ColorSpaceKind::Linear);
    }
}
