//! Advertising value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format of an ad unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    /// Persistent strip shown until hidden
    Banner,
    /// Full-screen single-use unit
    Interstitial,
    /// Full-screen single-use unit that grants a reward
    Rewarded,
}

impl AdFormat {
    /// Lifecycle class of units with this format
    pub fn resource_class(&self) -> ResourceClass {
        match self {
            AdFormat::Banner => ResourceClass::Persistent,
            AdFormat::Interstitial | AdFormat::Rewarded => ResourceClass::Consumable,
        }
    }
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdFormat::Banner => f.write_str("banner"),
            AdFormat::Interstitial => f.write_str("interstitial"),
            AdFormat::Rewarded => f.write_str("rewarded"),
        }
    }
}

/// How a resource moves through its lifecycle once loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceClass {
    /// Stays displayed until explicitly hidden; reload replaces the object
    Persistent,
    /// Consumed by one show; reloads automatically afterwards
    Consumable,
}

/// Banner dimensions in density-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BannerSize {
    /// 320x50 standard banner
    #[default]
    Standard,
    /// 320x100 large banner
    Large,
    /// 300x250 medium rectangle
    MediumRectangle,
}

impl BannerSize {
    /// Width and height in dp
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            BannerSize::Standard => (320, 50),
            BannerSize::Large => (320, 100),
            BannerSize::MediumRectangle => (300, 250),
        }
    }
}

/// Screen edge a banner is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BannerPosition {
    /// Top of the screen
    #[default]
    Top,
    /// Bottom of the screen
    Bottom,
}

/// Placement parameters passed to the vendor construction primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BannerPlacement {
    /// Banner size
    pub size: BannerSize,
    /// Banner position
    pub position: BannerPosition,
}

/// Vendor signal that counts as "the unit was used" for the completion join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrimarySignal {
    /// The vendor reported the unit on screen
    Shown,
    /// The vendor reported a paid impression (reward earned)
    #[default]
    Paid,
}

/// Everything needed to construct one ad unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdUnitSpec {
    /// Vendor ad unit identifier
    pub unit_id: String,
    /// Display format
    pub format: AdFormat,
    /// Banner placement (ignored for full-screen formats)
    pub placement: BannerPlacement,
    /// Signal joined with "closed" to complete a consumption cycle
    pub primary_signal: PrimarySignal,
}

impl AdUnitSpec {
    /// Create a spec with default placement and primary signal
    pub fn new(unit_id: impl Into<String>, format: AdFormat) -> Self {
        Self {
            unit_id: unit_id.into(),
            format,
            placement: BannerPlacement::default(),
            primary_signal: PrimarySignal::default(),
        }
    }

    /// Create a banner spec
    pub fn banner(unit_id: impl Into<String>) -> Self {
        Self::new(unit_id, AdFormat::Banner)
    }

    /// Create an interstitial spec
    pub fn interstitial(unit_id: impl Into<String>) -> Self {
        Self::new(unit_id, AdFormat::Interstitial)
    }

    /// Create a rewarded spec
    pub fn rewarded(unit_id: impl Into<String>) -> Self {
        Self::new(unit_id, AdFormat::Rewarded)
    }

    /// Set the banner placement
    pub fn with_placement(mut self, placement: BannerPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the primary completion signal
    pub fn with_primary_signal(mut self, signal: PrimarySignal) -> Self {
        self.primary_signal = signal;
        self
    }

    /// Lifecycle class derived from the format
    pub fn resource_class(&self) -> ResourceClass {
        self.format.resource_class()
    }
}

/// Revenue reported for a paid impression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRevenue {
    /// Ad unit that earned the revenue
    pub unit_id: String,
    /// Revenue amount in currency units (eCPM / 1000)
    pub amount: f64,
}

impl AdRevenue {
    /// Convert a vendor eCPM value into per-impression revenue
    pub fn from_ecpm(unit_id: impl Into<String>, ecpm: f64) -> Self {
        Self {
            unit_id: unit_id.into(),
            amount: ecpm / 1000.0,
        }
    }
}
