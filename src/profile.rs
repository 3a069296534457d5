//! Wheelchair routing profile
//!
//! Owns the configuration, the tag category tables and the evidence
//! collaborators, and hands out the borrowed classifiers built on them.
//! [`WheelchairProfile::process_way`] runs access, speed and priority for one
//! way; [`WheelchairProfile::process_ways`] does the same for a batch in
//! parallel.

use rayon::prelude::*;

use crate::access::{AccessClassifier, AccessVerdict};
use crate::config::WheelchairConfig;
use crate::error::Result;
use crate::evidence::{
    AttachedSidewalkEvidence, DurationFerrySpeed, FerrySpeedLookup, MaxSpeedLookup,
    OsmAttachedSidewalk, OsmMaxSpeed, OsmPedestrianized, PedestrianizedWayEvidence,
};
use crate::node::NodeAccessRule;
use crate::priority::{PriorityBand, PriorityScorer};
use crate::relation::{RelationBonusStore, RelationSignal};
use crate::speed::{SpeedAdjuster, SpeedValue};
use crate::tables::TagCategoryTables;
use crate::tags::{TagBag, Tags};

/// Per-way classification result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayOutput {
    pub verdict: AccessVerdict,
    /// Can traverse forward (along way direction)
    pub access_fwd: bool,
    /// Can traverse reverse; wheelchair users ignore oneway
    pub access_rev: bool,
    /// `None` for excluded ways
    pub speed: Option<SpeedValue>,
    /// `None` for excluded ways and ferries
    pub priority: Option<PriorityBand>,
    /// Bonus recorded from route relations, kept apart from `priority`
    pub relation_bonus: i32,
    /// Way carries surface/smoothness/incline/... detail
    pub has_accessibility_detail: bool,
}

impl WayOutput {
    fn excluded() -> Self {
        Self {
            verdict: AccessVerdict::Excluded,
            access_fwd: false,
            access_rev: false,
            speed: None,
            priority: None,
            relation_bonus: 0,
            has_accessibility_detail: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayAttr {
    pub way_id: i64,
    pub output: WayOutput,
}

/// Evidence collaborators used by speed and priority
pub struct Evidence {
    pub ferry_speed: Box<dyn FerrySpeedLookup>,
    pub sidewalk: Box<dyn AttachedSidewalkEvidence>,
    pub pedestrianized: Box<dyn PedestrianizedWayEvidence>,
    pub max_speed: Box<dyn MaxSpeedLookup>,
}

impl Evidence {
    /// Default OSM-tag based collaborators for a config.
    pub fn from_config(config: &WheelchairConfig) -> Self {
        Self {
            ferry_speed: Box::new(DurationFerrySpeed::new(
                &config.ferry,
                config.min_speed,
                config.max_speed,
            )),
            sidewalk: Box::new(OsmAttachedSidewalk::new(
                config.pedestrian.usable_sidewalk_values.clone(),
            )),
            pedestrianized: Box::new(OsmPedestrianized::default()),
            max_speed: Box::new(OsmMaxSpeed),
        }
    }
}

/// Wheelchair profile: shared, read-only after construction
pub struct WheelchairProfile {
    config: WheelchairConfig,
    tables: TagCategoryTables,
    evidence: Evidence,
}

impl WheelchairProfile {
    pub const NAME: &'static str = "wheelchair";
    pub const VERSION: u32 = 2;

    /// Profile with validated config and default evidence collaborators.
    pub fn new(config: WheelchairConfig) -> Result<Self> {
        let evidence = Evidence::from_config(&config);
        Self::with_evidence(config, evidence)
    }

    /// Profile with validated config and caller-supplied evidence collaborators.
    pub fn with_evidence(config: WheelchairConfig, evidence: Evidence) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tables: TagCategoryTables::new(),
            evidence,
        })
    }

    pub fn config(&self) -> &WheelchairConfig {
        &self.config
    }

    pub fn tables(&self) -> &TagCategoryTables {
        &self.tables
    }

    pub fn access(&self) -> AccessClassifier<'_> {
        AccessClassifier::new(&self.tables, &self.config.pedestrian, self.config.block_fords)
    }

    pub fn speed(&self) -> SpeedAdjuster<'_> {
        SpeedAdjuster::new(
            &self.tables,
            &self.config.pedestrian,
            self.evidence.ferry_speed.as_ref(),
            self.config.mean_speed,
            self.config.min_speed,
            self.config.max_speed,
        )
    }

    pub fn priority(&self) -> PriorityScorer<'_> {
        PriorityScorer::new(
            &self.tables,
            &self.config.pedestrian,
            self.evidence.sidewalk.as_ref(),
            self.evidence.pedestrianized.as_ref(),
            self.evidence.max_speed.as_ref(),
        )
    }

    pub fn nodes(&self) -> NodeAccessRule<'_> {
        NodeAccessRule::new(&self.tables, &self.config.pedestrian, self.config.block_fords)
    }

    pub fn relations(&self) -> RelationSignal {
        RelationSignal::new(
            self.config.relation_prefer_bonus,
            self.config.relation_ferry_bonus,
        )
    }

    /// Classify one way. Excluded ways skip speed and priority.
    pub fn process_way(&self, tags: &dyn Tags, relation_bonus: i32) -> WayOutput {
        let verdict = self.access().classify(tags);
        if verdict.is_excluded() {
            return WayOutput::excluded();
        }

        let speed = self.speed().adjust_speed(tags, verdict);
        let priority = match verdict {
            AccessVerdict::Routable => Some(self.priority().score_priority(tags, relation_bonus)),
            _ => None,
        };

        WayOutput {
            verdict,
            access_fwd: true,
            access_rev: true,
            speed,
            priority,
            relation_bonus,
            has_accessibility_detail: self.tables.accessibility_attribute_count(tags) > 0,
        }
    }

    /// True when the node blocks traversal.
    pub fn process_node(&self, tags: &dyn Tags) -> bool {
        self.nodes().classify_node(tags)
    }

    /// Bonus for a route relation.
    pub fn process_relation(&self, tags: &dyn Tags) -> i32 {
        self.relations().score_relation(tags)
    }

    /// Merge a relation's bonus into the store for all its member ways.
    pub fn merge_relation(&self, store: &RelationBonusStore, tags: &dyn Tags, member_ways: &[i64]) -> i32 {
        store.merge_relation(&self.relations(), tags, member_ways)
    }

    /// Classify a batch of ways in parallel, in input order.
    pub fn process_ways(&self, ways: &[(i64, TagBag)], bonuses: &RelationBonusStore) -> Vec<WayAttr> {
        let attrs: Vec<WayAttr> = ways
            .par_iter()
            .map(|(way_id, tags)| WayAttr {
                way_id: *way_id,
                output: self.process_way(tags, bonuses.get(*way_id).unwrap_or(0)),
            })
            .collect();

        let routable = attrs
            .iter()
            .filter(|a| !a.output.verdict.is_excluded())
            .count();
        tracing::debug!(
            ways = attrs.len(),
            routable,
            excluded = attrs.len() - routable,
            "processed wheelchair ways"
        );
        attrs
    }
}

impl Default for WheelchairProfile {
    fn default() -> Self {
        // default config always passes validation
        let config = WheelchairConfig::default();
        Self {
            evidence: Evidence::from_config(&config),
            config,
            tables: TagCategoryTables::new(),
        }
    }
}
