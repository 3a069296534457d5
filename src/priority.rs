//! Priority scoring
//!
//! Positive and negative signals are counted separately, their difference is
//! mapped onto a [`PriorityBand`]. Relation bonuses travel through their own
//! channel (see [`crate::relation`]) and are not part of the score.

use std::fmt;

use crate::config::{PedestrianDefaults, KEY_FOOT};
use crate::evidence::{AttachedSidewalkEvidence, MaxSpeedLookup, PedestrianizedWayEvidence};
use crate::tables::TagCategoryTables;
use crate::tags::Tags;

/// Routing preference, worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityBand {
    AvoidAtAllCosts,
    ReachDest,
    AvoidIfPossible,
    Unchanged,
    Prefer,
    VeryNice,
    Best,
}

impl PriorityBand {
    pub const ALL: [PriorityBand; 7] = [
        PriorityBand::AvoidAtAllCosts,
        PriorityBand::ReachDest,
        PriorityBand::AvoidIfPossible,
        PriorityBand::Unchanged,
        PriorityBand::Prefer,
        PriorityBand::VeryNice,
        PriorityBand::Best,
    ];

    /// Map a feature score onto a band (inclusive upper bounds).
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=-6 => PriorityBand::AvoidAtAllCosts,
            -5..=-3 => PriorityBand::ReachDest,
            -2..=-1 => PriorityBand::AvoidIfPossible,
            0 => PriorityBand::Unchanged,
            1..=2 => PriorityBand::Prefer,
            3..=5 => PriorityBand::VeryNice,
            _ => PriorityBand::Best,
        }
    }

    /// Numeric code, 1 (avoid at all costs) to 7 (best). 0 is reserved for "worst".
    pub fn code(self) -> u8 {
        match self {
            PriorityBand::AvoidAtAllCosts => 1,
            PriorityBand::ReachDest => 2,
            PriorityBand::AvoidIfPossible => 3,
            PriorityBand::Unchanged => 4,
            PriorityBand::Prefer => 5,
            PriorityBand::VeryNice => 6,
            PriorityBand::Best => 7,
        }
    }

    /// Weighting factor in (0, 1].
    pub fn factor(self) -> f64 {
        f64::from(self.code()) / f64::from(PriorityBand::Best.code())
    }

    pub fn name(self) -> &'static str {
        match self {
            PriorityBand::AvoidAtAllCosts => "avoid_at_all_costs",
            PriorityBand::ReachDest => "reach_dest",
            PriorityBand::AvoidIfPossible => "avoid_if_possible",
            PriorityBand::Unchanged => "unchanged",
            PriorityBand::Prefer => "prefer",
            PriorityBand::VeryNice => "very_nice",
            PriorityBand::Best => "best",
        }
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positive and negative signal counts for one way
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureScore {
    pub positive: i32,
    pub negative: i32,
}

impl FeatureScore {
    pub fn sum(self) -> i32 {
        self.positive - self.negative
    }

    pub fn band(self) -> PriorityBand {
        PriorityBand::from_score(self.sum())
    }
}

/// Priority scorer over the shared tables and tag evidence
#[derive(Clone, Copy)]
pub struct PriorityScorer<'a> {
    tables: &'a TagCategoryTables,
    pedestrian: &'a PedestrianDefaults,
    sidewalk: &'a dyn AttachedSidewalkEvidence,
    pedestrianized: &'a dyn PedestrianizedWayEvidence,
    max_speed: &'a dyn MaxSpeedLookup,
}

impl<'a> PriorityScorer<'a> {
    pub fn new(
        tables: &'a TagCategoryTables,
        pedestrian: &'a PedestrianDefaults,
        sidewalk: &'a dyn AttachedSidewalkEvidence,
        pedestrianized: &'a dyn PedestrianizedWayEvidence,
        max_speed: &'a dyn MaxSpeedLookup,
    ) -> Self {
        Self {
            tables,
            pedestrian,
            sidewalk,
            pedestrianized,
            max_speed,
        }
    }

    /// Priority band for a way.
    ///
    /// `relation_bonus` is reported alongside for diagnostics only; the band
    /// depends on way tags alone.
    pub fn score_priority(&self, tags: &dyn Tags, relation_bonus: i32) -> PriorityBand {
        let score = self.feature_score(tags);
        let band = score.band();
        tracing::trace!(
            positive = score.positive,
            negative = score.negative,
            relation_bonus,
            band = %band,
            "scored way priority"
        );
        band
    }

    pub fn feature_score(&self, tags: &dyn Tags) -> FeatureScore {
        let t = self.tables;
        let p = self.pedestrian;
        let mut score = FeatureScore::default();

        // http://wiki.openstreetmap.org/wiki/DE:Key:traffic_calming
        let max_speed = self.max_speed.max_speed(tags);
        if max_speed > 0.0 {
            if max_speed > 50.0 {
                score.negative += 1;
                if max_speed > 60.0 {
                    score.negative += 1;
                    if max_speed > 80.0 {
                        score.negative += 1;
                    }
                }
            }
            if max_speed <= 20.0 {
                score.positive += 1;
            }
        }

        let highway = tags.get("highway");

        if let Some(h) = highway.filter(|h| t.assumed_accessible_highways.contains(h)) {
            score.negative += match h {
                "trunk" | "trunk_link" => 5,
                "primary" | "primary_link" => 3,
                _ => 1,
            };
        }

        // foot features are not rated twice
        let mut foot_evaluated = false;
        if let Some(h) = highway.filter(|h| t.fully_accessible_highways.contains(h)) {
            if TagCategoryTables::is_urban_pedestrian_for_priority(h) {
                score.positive += 5;
                foot_evaluated = true;
            } else {
                score.negative += 1;
            }
        }

        if !foot_evaluated {
            if tags.has_tag_in("sidewalk", &p.usable_sidewalk_values) {
                score.positive += 5;
            } else if tags.has_tag_with_value(KEY_FOOT, "designated") {
                score.positive += 5;
            } else if tags.has_tag_in(KEY_FOOT, &p.intended_values)
                || tags.has_tag_with_value("bicycle", "designated")
            {
                score.positive += 2;
            }
        }

        if !self.sidewalk.has_sidewalk_info(tags) && !self.pedestrianized.is_pedestrianized(tags) {
            score.negative += 2;
        }

        score
    }
}
