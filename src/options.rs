//! Map options: style configuration, insets and feature toggles.
//!
//! Defaults match what a freshly declared map gets when none of these are set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that may occur when loading options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("malformed map options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("edge insets must be finite and non-negative: {0:?}")]
    InvalidInsets(EdgeInsets),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationStyle {
    Flat,
    Realistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    Default,
    Muted,
}

/// Which points of interest the map labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointOfInterestFilter {
    IncludingAll,
    ExcludingAll,
    /// Only these categories.
    Including(Vec<String>),
    /// Everything but these categories.
    Excluding(Vec<String>),
}

impl Default for PointOfInterestFilter {
    fn default() -> PointOfInterestFilter {
        PointOfInterestFilter::IncludingAll
    }
}

/// Map style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapConfiguration {
    Standard {
        emphasis: EmphasisStyle,
        elevation: ElevationStyle,
        #[serde(default)]
        points_of_interest: PointOfInterestFilter,
        #[serde(default)]
        shows_traffic: bool,
    },
    Hybrid {
        elevation: ElevationStyle,
        #[serde(default)]
        points_of_interest: PointOfInterestFilter,
        #[serde(default)]
        shows_traffic: bool,
    },
    Imagery {
        elevation: ElevationStyle,
    },
}

/// Insets in view points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub fn uniform(inset: f64) -> EdgeInsets {
        EdgeInsets {
            top: inset,
            left: inset,
            bottom: inset,
            right: inset,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|i| i.is_finite() && *i >= 0.)
    }
}

/// Boolean map features, each backed by one native getter/setter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFlag {
    ShowsUserLocation,
    ZoomEnabled,
    ScrollEnabled,
    RotateEnabled,
    PitchEnabled,
    ShowsCompass,
    ShowsScale,
    ShowsZoomControls,
    ShowsPitchControl,
}

impl MapFlag {
    pub const ALL: [MapFlag; 9] = [
        MapFlag::ShowsUserLocation,
        MapFlag::ZoomEnabled,
        MapFlag::ScrollEnabled,
        MapFlag::RotateEnabled,
        MapFlag::PitchEnabled,
        MapFlag::ShowsCompass,
        MapFlag::ShowsScale,
        MapFlag::ShowsZoomControls,
        MapFlag::ShowsPitchControl,
    ];
}

/// Declared map options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Map style; None leaves whatever the map has.
    pub configuration: Option<MapConfiguration>,
    pub edge_insets: EdgeInsets,
    pub shows_user_location: bool,
    pub zoom_enabled: bool,
    pub scroll_enabled: bool,
    pub rotate_enabled: bool,
    pub pitch_enabled: bool,
    pub shows_compass: bool,
    pub shows_scale: bool,
    pub shows_zoom_controls: bool,
    pub shows_pitch_control: bool,
}

impl Default for MapOptions {
    fn default() -> MapOptions {
        MapOptions {
            configuration: None,
            edge_insets: EdgeInsets::default(),
            shows_user_location: false,
            zoom_enabled: true,
            scroll_enabled: true,
            rotate_enabled: true,
            pitch_enabled: true,
            shows_compass: false,
            shows_scale: false,
            shows_zoom_controls: false,
            shows_pitch_control: false,
        }
    }
}

impl MapOptions {
    /// Loads options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<MapOptions, OptionsError> {
        let options: MapOptions = serde_json::from_str(json)?;
        if !options.edge_insets.is_valid() {
            return Err(OptionsError::InvalidInsets(options.edge_insets));
        }
        Ok(options)
    }

    pub fn flag(&self, flag: MapFlag) -> bool {
        match flag {
            MapFlag::ShowsUserLocation => self.shows_user_location,
            MapFlag::ZoomEnabled => self.zoom_enabled,
            MapFlag::ScrollEnabled => self.scroll_enabled,
            MapFlag::RotateEnabled => self.rotate_enabled,
            MapFlag::PitchEnabled => self.pitch_enabled,
            MapFlag::ShowsCompass => self.shows_compass,
            MapFlag::ShowsScale => self.shows_scale,
            MapFlag::ShowsZoomControls => self.shows_zoom_controls,
            MapFlag::ShowsPitchControl => self.shows_pitch_control,
        }
    }

    pub fn set_flag(&mut self, flag: MapFlag, value: bool) {
        let slot = match flag {
            MapFlag::ShowsUserLocation => &mut self.shows_user_location,
            MapFlag::ZoomEnabled => &mut self.zoom_enabled,
            MapFlag::ScrollEnabled => &mut self.scroll_enabled,
            MapFlag::RotateEnabled => &mut self.rotate_enabled,
            MapFlag::PitchEnabled => &mut self.pitch_enabled,
            MapFlag::ShowsCompass => &mut self.shows_compass,
            MapFlag::ShowsScale => &mut self.shows_scale,
            MapFlag::ShowsZoomControls => &mut self.shows_zoom_controls,
            MapFlag::ShowsPitchControl => &mut self.shows_pitch_control,
        };
        *slot = value;
    }
}
