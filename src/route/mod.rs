//! Route templates: tokenizer, pattern matching, resolution table.

pub mod pattern;
pub mod table;
pub mod tokenizer;

pub use pattern::{path_only, split_path, Params, RouteError, RoutePattern, Segment};
pub use table::{Resolver, RouteTable};
