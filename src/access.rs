//! Way access classification
//!
//! The decision list is an ordered array of [`AccessRule`]s. Each rule either
//! decides the verdict or passes; the first decision wins. Every way reaches a
//! decision because [`AccessRule::NoHighway`] decides all ways without a
//! `highway` tag and [`AccessRule::PermissiveDefault`] decides everything
//! else.

use std::fmt;

use crate::config::{PedestrianDefaults, KEY_FOOT, KEY_WHEELCHAIR};
use crate::tables::TagCategoryTables;
use crate::tags::Tags;

const KEY_HIGHWAY: &str = "highway";
const KEY_SIDEWALK: &str = "sidewalk";
const KEY_ROUTE: &str = "route";

/// Traversal outcome for one way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessVerdict {
    /// Regular way, usable by wheelchair
    Routable,
    /// Ferry or shuttle train, usable with ferry speed
    Ferry,
    /// Not part of the wheelchair graph
    Excluded,
}

impl AccessVerdict {
    pub fn is_excluded(self) -> bool {
        self == AccessVerdict::Excluded
    }

    pub fn is_ferry(self) -> bool {
        self == AccessVerdict::Ferry
    }
}

/// One entry of the access decision list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRule {
    /// A restriction key is restricted with no intended value or usable sidewalk
    RestrictedWithoutOverride,
    /// Ways without a highway tag: ferries, platforms, or nothing
    NoHighway,
    InaccessibleSacScale,
    InaccessibleSurface,
    InaccessibleSmoothness,
    InaccessibleTracktype,
    WheelchairTag,
    NonAccessibleHighway,
    FootTag,
    UsableSidewalk,
    /// Assumed-accessible highway explicitly tagged without sidewalk
    MissingSidewalk,
    Motorroad,
    Ford,
    PermissiveDefault,
}

impl AccessRule {
    /// Evaluation order of the decision list.
    pub const ORDER: [AccessRule; 14] = [
        AccessRule::RestrictedWithoutOverride,
        AccessRule::NoHighway,
        AccessRule::InaccessibleSacScale,
        AccessRule::InaccessibleSurface,
        AccessRule::InaccessibleSmoothness,
        AccessRule::InaccessibleTracktype,
        AccessRule::WheelchairTag,
        AccessRule::NonAccessibleHighway,
        AccessRule::FootTag,
        AccessRule::UsableSidewalk,
        AccessRule::MissingSidewalk,
        AccessRule::Motorroad,
        AccessRule::Ford,
        AccessRule::PermissiveDefault,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AccessRule::RestrictedWithoutOverride => "access restrictions",
            AccessRule::NoHighway => "no highway",
            AccessRule::InaccessibleSacScale => "bad sac scale",
            AccessRule::InaccessibleSurface => "bad surface",
            AccessRule::InaccessibleSmoothness => "bad smoothness",
            AccessRule::InaccessibleTracktype => "bad tracktype",
            AccessRule::WheelchairTag => "wheelchair tag",
            AccessRule::NonAccessibleHighway => "non accessible highway",
            AccessRule::FootTag => "foot tag",
            AccessRule::UsableSidewalk => "usable sidewalk",
            AccessRule::MissingSidewalk => "assumed accessible highway without sidewalk",
            AccessRule::Motorroad => "motorroad",
            AccessRule::Ford => "ford",
            AccessRule::PermissiveDefault => "permissive default",
        }
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict together with the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub verdict: AccessVerdict,
    pub rule: AccessRule,
}

/// Wheelchair access classifier
///
/// A cheap borrowed view over the shared tables and pedestrian vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct AccessClassifier<'a> {
    tables: &'a TagCategoryTables,
    pedestrian: &'a PedestrianDefaults,
    block_fords: bool,
}

impl<'a> AccessClassifier<'a> {
    pub fn new(
        tables: &'a TagCategoryTables,
        pedestrian: &'a PedestrianDefaults,
        block_fords: bool,
    ) -> Self {
        Self {
            tables,
            pedestrian,
            block_fords,
        }
    }

    /// Classify a way. Total: every tag bag gets a verdict.
    pub fn classify(&self, tags: &dyn Tags) -> AccessVerdict {
        match self.evaluate(tags) {
            Some(decision) => {
                if decision.verdict.is_excluded() {
                    tracing::trace!(rule = %decision.rule, "way skipped");
                }
                decision.verdict
            }
            None => {
                tracing::warn!("no access rule matched, excluding way");
                AccessVerdict::Excluded
            }
        }
    }

    /// Run the decision list and report which rule fired.
    pub fn evaluate(&self, tags: &dyn Tags) -> Option<AccessDecision> {
        AccessRule::ORDER.iter().find_map(|&rule| {
            self.apply(rule, tags)
                .map(|verdict| AccessDecision { verdict, rule })
        })
    }

    /// Apply a single rule. `None` means the rule does not decide this way.
    pub fn apply(&self, rule: AccessRule, tags: &dyn Tags) -> Option<AccessVerdict> {
        let p = self.pedestrian;
        let t = self.tables;
        let highway = tags.get(KEY_HIGHWAY);

        match rule {
            AccessRule::RestrictedWithoutOverride => {
                let restricted = tags.has_any_tag_in(&p.restriction_keys, &p.restricted_values);
                let overridden = tags.has_any_tag_in(&p.restriction_keys, &p.intended_values)
                    || tags.has_tag_in(KEY_SIDEWALK, &p.usable_sidewalk_values);
                (restricted && !overridden).then_some(AccessVerdict::Excluded)
            }
            AccessRule::NoHighway => match highway {
                Some(_) => None,
                None => Some(self.classify_without_highway(tags)),
            },
            AccessRule::InaccessibleSacScale => {
                excluded_if(tags.has_tag_in("sac_scale", &t.inaccessible_sac_scales))
            }
            AccessRule::InaccessibleSurface => {
                excluded_if(tags.has_tag_in("surface", &t.inaccessible_surfaces))
            }
            AccessRule::InaccessibleSmoothness => {
                excluded_if(tags.has_tag_in("smoothness", &t.inaccessible_smoothnesses))
            }
            AccessRule::InaccessibleTracktype => {
                excluded_if(tags.has_tag_in("tracktype", &t.inaccessible_tracktypes))
            }
            AccessRule::WheelchairTag => self.consult(tags, KEY_WHEELCHAIR, AccessVerdict::Routable),
            AccessRule::NonAccessibleHighway => {
                excluded_if(highway.is_some_and(|h| t.non_accessible_highways.contains(h)))
            }
            AccessRule::FootTag => self.consult(tags, KEY_FOOT, AccessVerdict::Routable),
            AccessRule::UsableSidewalk => tags
                .has_tag_in(KEY_SIDEWALK, &p.usable_sidewalk_values)
                .then_some(AccessVerdict::Routable),
            AccessRule::MissingSidewalk => excluded_if(
                tags.has_tag_in(KEY_SIDEWALK, &p.no_sidewalk_values)
                    && highway.is_some_and(|h| t.assumed_accessible_highways.contains(h)),
            ),
            AccessRule::Motorroad => excluded_if(tags.has_tag_with_value("motorroad", "yes")),
            // "yes" on a wheelchair/foot tag was already let through above
            AccessRule::Ford => excluded_if(self.block_fords && is_ford(tags)),
            AccessRule::PermissiveDefault => Some(AccessVerdict::Routable),
        }
    }

    /// Ferries and platforms: wheelchair tag first, then foot tag.
    fn classify_without_highway(&self, tags: &dyn Tags) -> AccessVerdict {
        let t = self.tables;

        if tags.has_tag_in(KEY_ROUTE, &t.ferries) {
            return self
                .consult(tags, KEY_WHEELCHAIR, AccessVerdict::Ferry)
                .or_else(|| self.consult(tags, KEY_FOOT, AccessVerdict::Ferry))
                .unwrap_or(AccessVerdict::Ferry);
        }

        if tags.has_tag_in("public_transport", &t.accepted_public_transport)
            || tags.has_tag_in("railway", &t.accepted_public_transport)
        {
            return self
                .consult(tags, KEY_WHEELCHAIR, AccessVerdict::Routable)
                .or_else(|| self.consult(tags, KEY_FOOT, AccessVerdict::Routable))
                .unwrap_or(AccessVerdict::Routable);
        }

        AccessVerdict::Excluded
    }

    /// Intended value on `key` -> `allowed`, restricted value -> Excluded.
    fn consult(&self, tags: &dyn Tags, key: &str, allowed: AccessVerdict) -> Option<AccessVerdict> {
        let p = self.pedestrian;
        if tags.has_tag_in(key, &p.intended_values) {
            Some(allowed)
        } else if tags.has_tag_in(key, &p.restricted_values) {
            Some(AccessVerdict::Excluded)
        } else {
            None
        }
    }
}

fn excluded_if(condition: bool) -> Option<AccessVerdict> {
    condition.then_some(AccessVerdict::Excluded)
}

/// highway=ford or any ford=* tag.
pub(crate) fn is_ford(tags: &dyn Tags) -> bool {
    tags.has_tag_with_value(KEY_HIGHWAY, "ford") || tags.has_tag("ford")
}
