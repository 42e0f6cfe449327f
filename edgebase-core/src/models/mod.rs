pub mod edge;
pub mod record;

pub use edge::{Edge, NewEdge, RelatedNode};
pub use record::ContentRecord;
