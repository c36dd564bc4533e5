//! SPARQL 1.1 query results decoding
//!
//! # Example
//!
//! ```rust
//! use sparql_repo::sparql::QueryResult;
//!
//! let body = r#"{
//!     "head": {"vars": ["name"]},
//!     "results": {"bindings": [
//!         {"name": {"type": "literal", "value": "Alice", "xml:lang": "en"}},
//!         {"name": {"type": "mystery", "value": "dropped"}}
//!     ]}
//! }"#;
//!
//! let result = QueryResult::from_slice(body.as_bytes()).unwrap();
//! assert_eq!(result.len(), 2);
//!
//! // Cells that cannot be materialized are skipped in bulk
//! let by_variable = result.bindings();
//! assert_eq!(by_variable["name"].len(), 1);
//! ```

pub mod lookup;
mod results;

pub use results::{
    Binding, BindingKind, BindingRow, DecodeError, DecodeResult, Head, QueryResult, Results,
    Solution,
};
