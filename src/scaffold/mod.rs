mod builder;
mod export;
mod lattice;
mod layout;
mod linkage;
mod model;
mod tree;

pub use builder::{ChainBuilder, DEFAULT_BUDGET, Phase};
pub use export::{linkage_records, records_json};
pub use lattice::{LatticeGraph, SlotPos};
pub use layout::layout_tree;
pub use linkage::Linkage;
pub use model::{AssemblyModel, MarkerState};
pub use tree::{ChainTree, load_chain_tree};
