//! Object-store data structures and algorithms
//!
//! - `branch`: Branch names, HEAD state and revision expressions
//! - `builder`: Tree and commit construction
//! - `identity`: Author identity and clock sources
//! - `index`: Index entry types and the index file codec
//! - `objects`: Object types (blob, tree, commit) and their encodings

pub mod branch;
pub mod builder;
pub mod identity;
pub mod index;
pub mod objects;
