use std::f64::consts::{FRAC_PI_2, TAU};

use crate::foundation::core::{AXIS_COUNT, LogicalSize, Point};

/// The ten fixed heatmap zones, in data order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKey {
    Head,
    Face,
    Chest,
    UpperAbdomen,
    LowerAbdomen,
    Pelvis,
    ArmLeft,
    ArmRight,
    LegLeft,
    LegRight,
}

impl ZoneKey {
    /// All zones in data order.
    pub const ALL: [ZoneKey; AXIS_COUNT] = [
        Self::Head,
        Self::Face,
        Self::Chest,
        Self::UpperAbdomen,
        Self::LowerAbdomen,
        Self::Pelvis,
        Self::ArmLeft,
        Self::ArmRight,
        Self::LegLeft,
        Self::LegRight,
    ];

    /// Stable snake_case key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Face => "face",
            Self::Chest => "chest",
            Self::UpperAbdomen => "upper_abdomen",
            Self::LowerAbdomen => "lower_abdomen",
            Self::Pelvis => "pelvis",
            Self::ArmLeft => "arm_left",
            Self::ArmRight => "arm_right",
            Self::LegLeft => "leg_left",
            Self::LegRight => "leg_right",
        }
    }

    /// Built-in label used when no label is supplied.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Face => "Face",
            Self::Chest => "Chest",
            Self::UpperAbdomen => "Upper abdomen",
            Self::LowerAbdomen => "Lower abdomen",
            Self::Pelvis => "Pelvis",
            Self::ArmLeft => "Left arm",
            Self::ArmRight => "Right arm",
            Self::LegLeft => "Left leg",
            Self::LegRight => "Right leg",
        }
    }

    /// Position in [`ZoneKey::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a snake_case key.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|z| z.key() == key)
    }
}

/// Which side of a hotspot its label sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LabelSide {
    /// Label box ends left of the hotspot.
    Left,
    /// Label box is centred on the hotspot.
    Center,
    /// Label box starts right of the hotspot.
    Right,
}

/// One hotspot: a zone at a fixed normalized position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hotspot {
    /// Zone.
    pub zone: ZoneKey,
    /// Horizontal position in `[0, 1]` of the surface width.
    pub x: f64,
    /// Vertical position in `[0, 1]` of the surface height.
    pub y: f64,
    /// Base glow radius in logical units, before score growth.
    pub radius: f64,
    /// Label placement.
    pub side: LabelSide,
}

impl Hotspot {
    const fn at(zone: ZoneKey, x: f64, y: f64, side: LabelSide) -> Self {
        Self {
            zone,
            x,
            y,
            radius: 16.0,
            side,
        }
    }

    /// Centre in logical units for a surface of `size`.
    pub fn center(&self, size: LogicalSize) -> Point {
        Point::new(self.x * size.width, self.y * size.height)
    }
}

/// Static hotspot table, in [`ZoneKey::ALL`] order. Never derived from scores.
pub const HOTSPOT_LAYOUT: [Hotspot; AXIS_COUNT] = [
    Hotspot::at(ZoneKey::Head, 0.50, 0.18, LabelSide::Center),
    Hotspot::at(ZoneKey::Face, 0.50, 0.22, LabelSide::Center),
    Hotspot::at(ZoneKey::Chest, 0.50, 0.36, LabelSide::Center),
    Hotspot::at(ZoneKey::UpperAbdomen, 0.50, 0.48, LabelSide::Center),
    Hotspot::at(ZoneKey::LowerAbdomen, 0.50, 0.56, LabelSide::Center),
    Hotspot::at(ZoneKey::Pelvis, 0.50, 0.66, LabelSide::Center),
    Hotspot::at(ZoneKey::ArmLeft, 0.32, 0.46, LabelSide::Left),
    Hotspot::at(ZoneKey::ArmRight, 0.68, 0.46, LabelSide::Right),
    Hotspot::at(ZoneKey::LegLeft, 0.40, 0.82, LabelSide::Left),
    Hotspot::at(ZoneKey::LegRight, 0.60, 0.82, LabelSide::Right),
];

/// Radar frame geometry for one surface size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RadarGeometry {
    pub(crate) center: Point,
    pub(crate) radius: f64,
}

impl RadarGeometry {
    pub(crate) fn for_size(size: LogicalSize) -> Self {
        Self {
            center: Point::new(size.width / 2.0, size.height / 2.0 + 8.0),
            radius: 0.34 * size.min_side(),
        }
    }

    /// Point at `distance` along spoke `i`.
    pub(crate) fn along(&self, i: usize, distance: f64) -> Point {
        let a = spoke_angle(i);
        Point::new(
            self.center.x + distance * a.cos(),
            self.center.y + distance * a.sin(),
        )
    }
}

/// Angle of spoke `i`; spoke 0 points up, the rest follow clockwise on screen.
pub(crate) fn spoke_angle(i: usize) -> f64 {
    TAU * (i as f64) / (AXIS_COUNT as f64) - FRAC_PI_2
}
