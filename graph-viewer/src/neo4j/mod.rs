// Neo4j module - scoped connections, query execution and value conversion
pub mod convert;
pub mod source;

pub use convert::{bolt_to_json, collect_row, collect_value, node_record, relationship_record};
pub use source::Neo4jSource;
