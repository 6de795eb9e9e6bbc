pub mod classifier;
pub mod display;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod merge;
pub mod pruner;
pub mod store;
pub mod types;

pub use classifier::{KNOWN_RELATIONSHIPS, classify};
pub use display::{
    DisplayCategory, FounderEntry, child_count_badge, display_category, entity_label,
    founder_entries,
};
pub use error::{GraphError, GraphResult};
pub use extractor::{Extraction, RelatedItem, RelationDescriptor, extract, extract_tagged};
pub use identity::{entity_id, parse_node_id, resolve_id, resolve_id_for};
pub use merge::{MergeReport, merge_expansion, merge_founder, merge_root};
pub use pruner::{CollapsePlan, CollapseReport, collapse, plan_collapse};
pub use store::{GraphSnapshot, GraphStore, PositionUpdate};
pub use types::{
    Attributes, Edge, EdgeKey, EntityKind, LinkCategory, Node, NodeId, Position, RelationSource,
};
