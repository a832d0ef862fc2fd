pub mod classifier;
pub mod scene_graph;

pub use classifier::{
    Classification, ClassifiedNode, ClassifyError, NodeClass, NodeDescriptor, classify,
};
