//! Butterfly-wheelchair library
//!
//! Wheelchair routing profile for the butterfly-osm import pipeline: turns OSM
//! way, node and relation tags into an access verdict, a bounded speed and a
//! priority band.
//!
//! # Example
//!
//! ```
//! use butterfly_wheelchair::{AccessVerdict, PriorityBand, TagBag, WheelchairProfile};
//!
//! let profile = WheelchairProfile::default();
//! let way = TagBag::from_pairs(&[("highway", "footway"), ("footway", "crossing")]);
//! let out = profile.process_way(&way, 0);
//!
//! assert_eq!(out.verdict, AccessVerdict::Routable);
//! assert_eq!(out.speed.map(|s| s.get()), Some(10.0));
//! assert_eq!(out.priority, Some(PriorityBand::VeryNice));
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod evidence;
pub mod node;
pub mod priority;
pub mod profile;
pub mod relation;
pub mod speed;
pub mod tables;
pub mod tags;

pub use access::{AccessClassifier, AccessDecision, AccessRule, AccessVerdict};
pub use config::{FerryConfig, PedestrianDefaults, WheelchairConfig};
pub use error::{Error, Result};
pub use evidence::{
    AttachedSidewalkEvidence, FerrySpeedLookup, MaxSpeedLookup, PedestrianizedWayEvidence,
};
pub use node::{NodeAccessRule, NodeBlock};
pub use priority::{FeatureScore, PriorityBand, PriorityScorer};
pub use profile::{Evidence, WayAttr, WayOutput, WheelchairProfile};
pub use relation::{RelationBonusStore, RelationSignal};
pub use speed::{SpeedAdjuster, SpeedValue};
pub use tables::{TagCategorySet, TagCategoryTables};
pub use tags::{TagBag, TagLookup, Tags};
