//! Wheelchair speed derivation
//!
//! Speeds start at the mean speed and are multiplied down or up depending on
//! how well the way is known to suit wheelchairs. The multipliers compound in
//! a fixed order, so the order of [`SpeedAdjuster::adjust_speed`]'s steps is
//! part of the contract. Ways without tagged sidewalks end up slower, which
//! biases travel times toward confirmed infrastructure.

use crate::access::AccessVerdict;
use crate::config::{PedestrianDefaults, KEY_FOOT, KEY_WHEELCHAIR};
use crate::evidence::FerrySpeedLookup;
use crate::tables::TagCategoryTables;
use crate::tags::Tags;

const ASSUMED_WITHOUT_SIDEWALK: f64 = 0.8;
const URBAN_PEDESTRIAN: f64 = 1.25;
const CROSSING: f64 = 2.0;
const FULLY_WITHOUT_SIDEWALK: f64 = 0.9;
const RESTRICTED_BUT_INTENDED: f64 = 1.25;
const PROBLEMATIC_GROUND: f64 = 0.1;
const PREFERRED_GROUND: f64 = 3.0;

/// Speed in profile units, always inside the configured bounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedValue(f64);

impl SpeedValue {
    /// Clamp `raw` into `[min, max]`. NaN maps to `min`; `max` wins when the
    /// bounds are inverted.
    pub fn clamped(raw: f64, min: f64, max: f64) -> Self {
        Self(raw.max(min).min(max))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Speed adjuster over the shared tables
#[derive(Clone, Copy)]
pub struct SpeedAdjuster<'a> {
    tables: &'a TagCategoryTables,
    pedestrian: &'a PedestrianDefaults,
    ferry: &'a dyn FerrySpeedLookup,
    mean_speed: f64,
    min_speed: f64,
    max_speed: f64,
}

impl<'a> SpeedAdjuster<'a> {
    pub fn new(
        tables: &'a TagCategoryTables,
        pedestrian: &'a PedestrianDefaults,
        ferry: &'a dyn FerrySpeedLookup,
        mean_speed: f64,
        min_speed: f64,
        max_speed: f64,
    ) -> Self {
        Self {
            tables,
            pedestrian,
            ferry,
            mean_speed,
            min_speed,
            max_speed,
        }
    }

    /// Speed for a way with the given verdict; `None` for excluded ways.
    pub fn adjust_speed(&self, tags: &dyn Tags, verdict: AccessVerdict) -> Option<SpeedValue> {
        let raw = match verdict {
            AccessVerdict::Excluded => return None,
            AccessVerdict::Ferry => self.ferry.ferry_speed(tags),
            AccessVerdict::Routable => self.raw_way_speed(tags),
        };
        Some(SpeedValue::clamped(raw, self.min_speed, self.max_speed))
    }

    /// Unclamped speed after all multipliers.
    pub fn raw_way_speed(&self, tags: &dyn Tags) -> f64 {
        let t = self.tables;
        let p = self.pedestrian;
        let mut speed = self.mean_speed;
        let has_sidewalk = tags.has_tag_in("sidewalk", &p.usable_sidewalk_values);

        if let Some(highway) = tags.get("highway") {
            if t.assumed_accessible_highways.contains(highway) && !has_sidewalk {
                speed *= ASSUMED_WITHOUT_SIDEWALK;
            }

            if t.fully_accessible_highways.contains(highway) {
                if TagCategoryTables::is_urban_pedestrian_for_speed(highway) {
                    speed *= URBAN_PEDESTRIAN;
                    if tags.has_tag_with_value("footway", "crossing")
                        || highway == "crossing"
                    {
                        speed *= CROSSING;
                    }
                } else if !has_sidewalk {
                    speed *= FULLY_WITHOUT_SIDEWALK;
                }
            }

            if t.restricted_highways.contains(highway)
                && (tags.has_tag_in(KEY_FOOT, &p.intended_values)
                    || tags.has_tag_in(KEY_WHEELCHAIR, &p.intended_values))
            {
                speed *= RESTRICTED_BUT_INTENDED;
                if tags.has_tag_with_value("cycleway", "crossing")
                    || tags.has_tag_with_value("bridleway", "crossing")
                    || highway == "crossing"
                {
                    speed *= CROSSING;
                }
            }
        }

        if tags.has_tag_in("surface", &t.problematic_surfaces)
            || tags.has_tag_in("smoothness", &t.problematic_smoothnesses)
            || tags.has_tag_in("tracktype", &t.problematic_tracktypes)
        {
            speed *= PROBLEMATIC_GROUND;
        }

        if tags.has_tag_in("surface", &t.preferred_surfaces)
            || tags.has_tag_in("smoothness", &t.preferred_smoothnesses)
        {
            speed *= PREFERRED_GROUND;
        }

        speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FerryConfig;
    use crate::evidence::DurationFerrySpeed;
    use crate::tags::TagBag;

    fn speed(pairs: &[(&str, &str)]) -> f64 {
        let tables = TagCategoryTables::new();
        let pedestrian = PedestrianDefaults::wheelchair();
        let ferry = DurationFerrySpeed::new(&FerryConfig::default(), 1.0, 10.0);
        SpeedAdjuster::new(&tables, &pedestrian, &ferry, 4.0, 1.0, 10.0)
            .adjust_speed(&TagBag::from_pairs(pairs), AccessVerdict::Routable)
            .map(SpeedValue::get)
            .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_residential_without_sidewalk() {
        // urban pedestrian subtype: 4 * 1.25
        assert_close(speed(&[("highway", "residential")]), 5.0);
    }

    #[test]
    fn test_unclassified_without_sidewalk() {
        assert_close(speed(&[("highway", "unclassified")]), 3.6);
        assert_close(speed(&[("highway", "service"), ("sidewalk", "both")]), 4.0);
    }

    #[test]
    fn test_assumed_highway() {
        assert_close(speed(&[("highway", "primary")]), 3.2);
        assert_close(speed(&[("highway", "primary"), ("sidewalk", "left")]), 4.0);
    }

    #[test]
    fn test_footway_crossing_hits_cap() {
        assert_close(speed(&[("highway", "footway"), ("footway", "crossing")]), 10.0);
        assert_close(speed(&[("highway", "footway")]), 5.0);
    }

    #[test]
    fn test_restricted_highway_needs_intent() {
        assert_close(speed(&[("highway", "cycleway")]), 4.0);
        assert_close(speed(&[("highway", "cycleway"), ("foot", "yes")]), 5.0);
        assert_close(
            speed(&[("highway", "cycleway"), ("wheelchair", "limited"), ("cycleway", "crossing")]),
            10.0,
        );
    }

    #[test]
    fn test_ground_multipliers() {
        // 4 * 0.1 floors at 1
        assert_close(speed(&[("highway", "path"), ("surface", "gravel")]), 1.0);
        // 4 * 3 caps at 10
        assert_close(speed(&[("highway", "path"), ("surface", "asphalt")]), 10.0);
        // 4 * 0.9 * 3
        assert_close(
            speed(&[("highway", "unclassified"), ("smoothness", "excellent")]),
            10.0,
        );
        assert_close(speed(&[("highway", "track"), ("tracktype", "grade2")]), 1.0);
    }

    #[test]
    fn test_penalty_applies_before_bonus() {
        // 4 * 0.1 * 3 = 1.2, not clamped in between
        assert_close(
            speed(&[("highway", "path"), ("smoothness", "intermediate"), ("surface", "paved")]),
            1.2,
        );
    }

    #[test]
    fn test_excluded_and_ferry() {
        let tables = TagCategoryTables::new();
        let pedestrian = PedestrianDefaults::wheelchair();
        let ferry = DurationFerrySpeed::new(&FerryConfig::default(), 1.0, 10.0);
        let adjuster = SpeedAdjuster::new(&tables, &pedestrian, &ferry, 4.0, 1.0, 10.0);
        let tags = TagBag::new().with("route", "ferry");

        assert_eq!(adjuster.adjust_speed(&tags, AccessVerdict::Excluded), None);
        assert_eq!(
            adjuster.adjust_speed(&tags, AccessVerdict::Ferry).map(SpeedValue::get),
            Some(5.0)
        );
    }

    #[test]
    fn test_clamped_nan() {
        assert_eq!(SpeedValue::clamped(f64::NAN, 1.0, 10.0).get(), 1.0);
        assert_eq!(SpeedValue::clamped(-3.0, 1.0, 10.0).get(), 1.0);
        assert_eq!(SpeedValue::clamped(42.0, 1.0, 10.0).get(), 10.0);
    }

    #[test]
    fn test_clamped_with_bad_bounds() {
        assert_eq!(SpeedValue::clamped(4.0, 5.0, 2.0).get(), 2.0);
        assert_eq!(SpeedValue::clamped(4.0, f64::NAN, 10.0).get(), 4.0);
        assert_eq!(SpeedValue::clamped(4.0, 1.0, f64::NAN).get(), 4.0);

        let tables = TagCategoryTables::new();
        let pedestrian = PedestrianDefaults::wheelchair();
        let ferry = DurationFerrySpeed::new(&FerryConfig::default(), 5.0, 2.0);
        let adjuster = SpeedAdjuster::new(&tables, &pedestrian, &ferry, 3.0, 5.0, 2.0);
        let way = TagBag::new().with("highway", "residential");
        assert_eq!(
            adjuster.adjust_speed(&way, AccessVerdict::Routable).map(SpeedValue::get),
            Some(2.0)
        );
        let boat = TagBag::new().with("route", "ferry");
        assert_eq!(
            adjuster.adjust_speed(&boat, AccessVerdict::Ferry).map(SpeedValue::get),
            Some(2.0)
        );
    }
}
