//! Tag category tables for the wheelchair profile
//!
//! Every tier is a [`TagCategorySet`] built once in [`TagCategoryTables::new`]
//! and only read afterwards. A single table instance is shared by reference
//! across all classification calls (and threads).
//!
//! See <http://wiki.openstreetmap.org/wiki/Key:barrier> and
//! <http://wiki.openstreetmap.org/wiki/Key:sac_scale> for the value lists.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Immutable set of tag values forming one semantic tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagCategorySet {
    values: FxHashSet<String>,
}

impl TagCategorySet {
    pub fn from_values(values: &[&str]) -> Self {
        values.iter().map(|v| v.to_string()).collect()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Values in sorted order (stable output for tests and metadata).
    pub fn sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.iter().collect();
        values.sort_unstable();
        values
    }
}

impl FromIterator<String> for TagCategorySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<String>> for TagCategorySet {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<TagCategorySet> for Vec<String> {
    fn from(set: TagCategorySet) -> Self {
        let mut values: Vec<String> = set.values.into_iter().collect();
        values.sort_unstable();
        values
    }
}

/// Highway values treated as urban pedestrian infrastructure for speed.
pub const URBAN_PEDESTRIAN_SPEED_HIGHWAYS: [&str; 4] =
    ["footway", "pedestrian", "living_street", "residential"];

/// Highway values treated as dedicated pedestrian infrastructure for priority.
pub const URBAN_PEDESTRIAN_PRIORITY_HIGHWAYS: [&str; 3] = ["footway", "pedestrian", "living_street"];

/// Domain knowledge base for wheelchair accessibility
#[derive(Debug, Clone)]
pub struct TagCategoryTables {
    /// Fully suitable for wheelchair users
    pub fully_accessible_highways: TagCategorySet,
    /// Suitable, but ways tagged with a usable sidewalk are preferred
    pub assumed_accessible_highways: TagCategorySet,
    /// Only suitable when surface/smoothness information confirms it
    pub limited_accessible_highways: TagCategorySet,
    /// Potentially not allowed; needs foot=yes or wheelchair=yes
    pub restricted_highways: TagCategorySet,
    /// Never accessible (steps)
    pub non_accessible_highways: TagCategorySet,

    pub problematic_surfaces: TagCategorySet,
    pub inaccessible_surfaces: TagCategorySet,
    pub preferred_surfaces: TagCategorySet,
    pub problematic_smoothnesses: TagCategorySet,
    pub inaccessible_smoothnesses: TagCategorySet,
    pub preferred_smoothnesses: TagCategorySet,
    pub problematic_tracktypes: TagCategorySet,
    pub inaccessible_tracktypes: TagCategorySet,
    pub inaccessible_sac_scales: TagCategorySet,

    /// Barriers that always block
    pub absolute_barriers: TagCategorySet,
    /// Barriers that block only when access tags say so
    pub potential_barriers: TagCategorySet,
    /// Barriers a wheelchair can never pass
    pub inaccessible_barriers: TagCategorySet,
    /// Whether a potential barrier blocks when nothing else is known
    pub block_by_default: bool,

    pub accepted_public_transport: TagCategorySet,
    pub ferries: TagCategorySet,
    /// Keys whose presence marks a way as carrying accessibility detail
    pub accessibility_attributes: TagCategorySet,
}

impl TagCategoryTables {
    pub fn new() -> Self {
        Self {
            fully_accessible_highways: TagCategorySet::from_values(&[
                "footway",
                "pedestrian",
                "living_street",
                "residential",
                "unclassified",
                "service",
                "tertiary",
                "tertiary_link",
                "road",
            ]),
            assumed_accessible_highways: TagCategorySet::from_values(&[
                "trunk",
                "trunk_link",
                "primary",
                "primary_link",
                "secondary",
                "secondary_link",
            ]),
            limited_accessible_highways: TagCategorySet::from_values(&["path", "track"]),
            restricted_highways: TagCategorySet::from_values(&["bridleway", "cycleway"]),
            non_accessible_highways: TagCategorySet::from_values(&["steps"]),

            problematic_surfaces: TagCategorySet::from_values(&[
                "cobblestone",
                "unhewn_cobblestone",
                "sett",
                "unpaved",
                "gravel",
                "compacted",
                "pebblestone",
                "grass_paver",
                "woodchips",
            ]),
            inaccessible_surfaces: TagCategorySet::from_values(&[
                "earth", "grass", "dirt", "mud", "sand", "snow", "ice", "salt",
            ]),
            preferred_surfaces: TagCategorySet::from_values(&["asphalt", "paved"]),
            problematic_smoothnesses: TagCategorySet::from_values(&["intermediate"]),
            inaccessible_smoothnesses: TagCategorySet::from_values(&[
                "bad",
                "very_bad",
                "horrible",
                "very_horrible",
            ]),
            preferred_smoothnesses: TagCategorySet::from_values(&["excellent"]),
            problematic_tracktypes: TagCategorySet::from_values(&["grade2", "grade3"]),
            inaccessible_tracktypes: TagCategorySet::from_values(&["grade4", "grade5"]),
            // everything except "hiking" is out of reach
            inaccessible_sac_scales: TagCategorySet::from_values(&[
                "mountain_hiking",
                "demanding_mountain_hiking",
                "alpine_hiking",
                "demanding_alpine_hiking",
                "difficult_alpine_hiking",
            ]),

            absolute_barriers: TagCategorySet::from_values(&[
                "fence",
                "wall",
                "hedge",
                "retaining_wall",
                "city_wall",
                "ditch",
                "hedge_bank",
                "guard_rail",
                "wire_fence",
                "embankment",
            ]),
            potential_barriers: TagCategorySet::from_values(&[
                "gate",
                "bollard",
                "lift_gate",
                "cycle_barrier",
                "entrance",
                "cattle_grid",
                "swing_gate",
                "chain",
                "bump_gate",
            ]),
            inaccessible_barriers: TagCategorySet::from_values(&[
                "stile",
                "block",
                "kissing_gate",
                "turnstile",
                "hampshire_gate",
            ]),
            block_by_default: false,

            // halt, station, subway_entrance and tram_stop usually describe a
            // building or the stop itself, not a platform
            accepted_public_transport: TagCategorySet::from_values(&["platform"]),
            ferries: TagCategorySet::from_values(&["ferry", "shuttle_train"]),
            accessibility_attributes: TagCategorySet::from_values(&[
                "surface",
                "smoothness",
                "tracktype",
                "incline",
                "sloped_curb",
                "sloped_kerb",
            ]),
        }
    }

    pub fn is_urban_pedestrian_for_speed(highway: &str) -> bool {
        URBAN_PEDESTRIAN_SPEED_HIGHWAYS.contains(&highway)
    }

    pub fn is_urban_pedestrian_for_priority(highway: &str) -> bool {
        URBAN_PEDESTRIAN_PRIORITY_HIGHWAYS.contains(&highway)
    }

    /// Count of accessibility-detail keys present on a way.
    pub fn accessibility_attribute_count(&self, tags: &dyn crate::tags::Tags) -> usize {
        self.accessibility_attributes
            .iter()
            .filter(|key| tags.has_tag(key))
            .count()
    }
}

impl Default for TagCategoryTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagBag;

    #[test]
    fn test_highway_tiers_are_disjoint() {
        let t = TagCategoryTables::new();
        let tiers = [
            &t.fully_accessible_highways,
            &t.assumed_accessible_highways,
            &t.limited_accessible_highways,
            &t.restricted_highways,
            &t.non_accessible_highways,
        ];

        for (i, a) in tiers.iter().enumerate() {
            for b in tiers.iter().skip(i + 1) {
                for value in a.iter() {
                    assert!(!b.contains(value), "{value} appears in two highway tiers");
                }
            }
        }
    }

    #[test]
    fn test_surface_tiers_are_disjoint() {
        let t = TagCategoryTables::new();
        for value in t.inaccessible_surfaces.iter() {
            assert!(!t.problematic_surfaces.contains(value));
            assert!(!t.preferred_surfaces.contains(value));
        }
        for value in t.problematic_surfaces.iter() {
            assert!(!t.preferred_surfaces.contains(value));
        }
    }

    #[test]
    fn test_table_sizes() {
        let t = TagCategoryTables::new();
        assert_eq!(t.fully_accessible_highways.len(), 9);
        assert_eq!(t.assumed_accessible_highways.len(), 6);
        assert_eq!(t.absolute_barriers.len(), 10);
        assert_eq!(t.potential_barriers.len(), 9);
        assert_eq!(t.inaccessible_barriers.len(), 5);
        assert_eq!(t.inaccessible_sac_scales.len(), 5);
        assert!(!t.block_by_default);
    }

    #[test]
    fn test_urban_pedestrian_subtypes() {
        assert!(TagCategoryTables::is_urban_pedestrian_for_speed("residential"));
        assert!(!TagCategoryTables::is_urban_pedestrian_for_priority("residential"));
        assert!(TagCategoryTables::is_urban_pedestrian_for_priority("living_street"));
        assert!(!TagCategoryTables::is_urban_pedestrian_for_speed("service"));
    }

    #[test]
    fn test_category_set_serde_sorted() {
        let set = TagCategorySet::from_values(&["yes", "designated"]);
        let values: Vec<String> = set.clone().into();
        assert_eq!(values, vec!["designated".to_string(), "yes".to_string()]);
        assert_eq!(TagCategorySet::from(values), set);
        assert_eq!(set.sorted(), vec!["designated", "yes"]);
    }

    #[test]
    fn test_accessibility_attribute_count() {
        let t = TagCategoryTables::new();
        let tags = TagBag::from_pairs(&[
            ("highway", "path"),
            ("surface", "asphalt"),
            ("incline", "2%"),
        ]);
        assert_eq!(t.accessibility_attribute_count(&tags), 2);
    }
}
