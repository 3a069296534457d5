//! Tag evidence collaborators
//!
//! Speed and priority scoring lean on a few lookups that belong to the wider
//! import pipeline: ferry speed, sidewalk presence, pedestrianised ways and
//! the legal max speed. Each is a trait so a pipeline can plug in its own
//! processor; the `Osm*` / [`DurationFerrySpeed`] types are the defaults.

use crate::config::FerryConfig;
use crate::speed::SpeedValue;
use crate::tables::TagCategorySet;
use crate::tags::Tags;

/// Speed of a ferry way, in profile speed units
pub trait FerrySpeedLookup: Send + Sync {
    fn ferry_speed(&self, tags: &dyn Tags) -> f64;
}

/// Whether a way carries any sidewalk information
pub trait AttachedSidewalkEvidence: Send + Sync {
    fn has_sidewalk_info(&self, tags: &dyn Tags) -> bool;
}

/// Whether a way is dedicated to pedestrians
pub trait PedestrianizedWayEvidence: Send + Sync {
    fn is_pedestrianized(&self, tags: &dyn Tags) -> bool;
}

/// Legal max speed of a way in km/h, 0 when absent or unparsable
pub trait MaxSpeedLookup: Send + Sync {
    fn max_speed(&self, tags: &dyn Tags) -> f64;
}

/// Ferry speed from `duration` and `estimated_distance`
#[derive(Debug, Clone, Copy)]
pub struct DurationFerrySpeed {
    pub unknown_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl DurationFerrySpeed {
    pub fn new(config: &FerryConfig, min_speed: f64, max_speed: f64) -> Self {
        Self {
            unknown_speed: config.unknown_speed,
            min_speed,
            max_speed,
        }
    }

    /// Trip duration in seconds from `duration:seconds` or `duration`.
    fn duration_seconds(tags: &dyn Tags) -> Option<f64> {
        if let Some(secs) = tags.get("duration:seconds").and_then(|v| v.trim().parse::<f64>().ok()) {
            return Some(secs);
        }
        tags.get("duration").and_then(parse_duration)
    }
}

impl FerrySpeedLookup for DurationFerrySpeed {
    fn ferry_speed(&self, tags: &dyn Tags) -> f64 {
        let duration = Self::duration_seconds(tags).filter(|d| *d > 0.0);
        let distance = tags
            .get("estimated_distance")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|d| *d > 0.0);

        let speed = match (duration, distance) {
            // metres per second -> km/h
            (Some(secs), Some(metres)) => metres / secs * 3.6,
            _ => self.unknown_speed,
        };
        SpeedValue::clamped(speed, self.min_speed, self.max_speed).get()
    }
}

/// Parse `HH:MM`, `HH:MM:SS` or plain minutes into seconds.
fn parse_duration(value: &str) -> Option<f64> {
    let value = value.trim();
    let parts: Vec<&str> = value.split(':').collect();
    let nums: Option<Vec<f64>> = parts.iter().map(|p| p.parse::<f64>().ok()).collect();
    match nums?.as_slice() {
        [minutes] => Some(minutes * 60.0),
        [hours, minutes] => Some(hours * 3600.0 + minutes * 60.0),
        [hours, minutes, seconds] => Some(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => None,
    }
}

/// Sidewalk information from `sidewalk` and `sidewalk:<side>[:*]` tags
#[derive(Debug, Clone)]
pub struct OsmAttachedSidewalk {
    usable_values: TagCategorySet,
}

impl OsmAttachedSidewalk {
    pub fn new(usable_values: TagCategorySet) -> Self {
        Self { usable_values }
    }
}

impl AttachedSidewalkEvidence for OsmAttachedSidewalk {
    fn has_sidewalk_info(&self, tags: &dyn Tags) -> bool {
        if tags.has_tag_in("sidewalk", &self.usable_values) {
            return true;
        }
        tags.keys().any(|key| {
            ["sidewalk:left", "sidewalk:right", "sidewalk:both"]
                .iter()
                .any(|side| key == *side || key.strip_prefix(side).is_some_and(|rest| rest.starts_with(':')))
        })
    }
}

/// Pedestrianised ways: pedestrian highway types and platforms
#[derive(Debug, Clone)]
pub struct OsmPedestrianized {
    pedestrian_highways: TagCategorySet,
}

impl Default for OsmPedestrianized {
    fn default() -> Self {
        Self {
            pedestrian_highways: TagCategorySet::from_values(&[
                "living_street",
                "pedestrian",
                "footway",
                "path",
                "crossing",
                "track",
            ]),
        }
    }
}

impl PedestrianizedWayEvidence for OsmPedestrianized {
    fn is_pedestrianized(&self, tags: &dyn Tags) -> bool {
        tags.has_tag_in("highway", &self.pedestrian_highways)
            || tags.has_tag_with_value("public_transport", "platform")
            || tags.has_tag_with_value("railway", "platform")
    }
}

/// Max speed from `maxspeed`, `maxspeed:forward` and `maxspeed:backward`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsmMaxSpeed;

/// Stand-in for `maxspeed=none`.
const UNLIMITED_MAX_SPEED: f64 = 150.0;
const WALK_MAX_SPEED: f64 = 6.0;
const MPH_TO_KMH: f64 = 1.609344;

impl OsmMaxSpeed {
    /// Parse a single maxspeed value; `None` when unusable.
    pub fn parse(value: &str) -> Option<f64> {
        let value = value.trim();
        match value {
            "none" => return Some(UNLIMITED_MAX_SPEED),
            "walk" => return Some(WALK_MAX_SPEED),
            _ => {}
        }

        if let Some(mph) = value.strip_suffix("mph") {
            return mph
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v * MPH_TO_KMH);
        }
        let kmh = value
            .strip_suffix("km/h")
            .or_else(|| value.strip_suffix("kmh"))
            .unwrap_or(value);
        kmh.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
    }
}

impl MaxSpeedLookup for OsmMaxSpeed {
    fn max_speed(&self, tags: &dyn Tags) -> f64 {
        ["maxspeed", "maxspeed:forward", "maxspeed:backward"]
            .iter()
            .filter_map(|key| tags.get(key).and_then(Self::parse))
            .fold(0.0, f64::max)
    }
}
