//! Node access: barriers and fords
//!
//! A node blocks wheelchair traversal when it is an absolute or inaccessible
//! barrier, a potential barrier whose access tags say no, or a ford that is
//! not explicitly wheelchair accessible.

use crate::access::is_ford;
use crate::config::{PedestrianDefaults, KEY_WHEELCHAIR};
use crate::tables::TagCategoryTables;
use crate::tags::Tags;

/// Why a node blocks traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeBlock {
    AbsoluteBarrier,
    InaccessibleBarrier,
    /// Potential barrier closed by access tags, locking or the default
    ClosedBarrier,
    Ford,
}

/// Node classifier over the shared tables
#[derive(Debug, Clone, Copy)]
pub struct NodeAccessRule<'a> {
    tables: &'a TagCategoryTables,
    pedestrian: &'a PedestrianDefaults,
    block_fords: bool,
}

impl<'a> NodeAccessRule<'a> {
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

    /// True when the node blocks traversal.
    pub fn classify_node(&self, tags: &dyn Tags) -> bool {
        let block = self.block_reason(tags);
        if let Some(reason) = block {
            tracing::trace!(?reason, "node blocks wheelchair traversal");
        }
        block.is_some()
    }

    pub fn block_reason(&self, tags: &dyn Tags) -> Option<NodeBlock> {
        self.barrier_block(tags).or_else(|| self.ford_block(tags))
    }

    fn barrier_block(&self, tags: &dyn Tags) -> Option<NodeBlock> {
        let t = self.tables;
        let p = self.pedestrian;

        if tags.has_tag_in("barrier", &t.absolute_barriers) {
            return Some(NodeBlock::AbsoluteBarrier);
        }
        if tags.has_tag_in("barrier", &t.inaccessible_barriers) {
            return Some(NodeBlock::InaccessibleBarrier);
        }

        if tags.has_tag_in("barrier", &t.potential_barriers) {
            let locked = tags.has_tag_with_value("locked", "yes");
            for key in &p.restriction_keys {
                if !locked && tags.has_tag_in(key, &p.intended_values) {
                    return None;
                }
                if tags.has_tag_in(key, &p.restricted_values) {
                    return Some(NodeBlock::ClosedBarrier);
                }
            }
            return t.block_by_default.then_some(NodeBlock::ClosedBarrier);
        }

        if tags.has_tag_with_value("ford", "yes") || tags.has_tag_with_value("highway", "ford") {
            let intended = tags.has_any_tag_in(&p.restriction_keys, &p.intended_values);
            let restricted = tags.has_any_tag_in(&p.restriction_keys, &p.restricted_values);
            if (self.block_fords && !intended) || restricted {
                return Some(NodeBlock::Ford);
            }
        }

        None
    }

    /// Fords are only crossed when declared wheelchair accessible.
    fn ford_block(&self, tags: &dyn Tags) -> Option<NodeBlock> {
        let wheelchair_ok = tags.has_tag_in(KEY_WHEELCHAIR, &self.pedestrian.intended_values);
        (self.block_fords && is_ford(tags) && !wheelchair_ok).then_some(NodeBlock::Ford)
    }
}
