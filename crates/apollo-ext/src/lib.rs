//! Extensions for `apollo-parser`: a kind-tagged enter/leave visitor over the CST.
//!
//! **Note**: This crate is specifically tied to `apollo-parser`'s CST types.
//!
//! This crate provides:
//! - [`CstNodeRef`] and [`NodeKind`] for referring to any walked node uniformly
//! - [`CstVisitor`] with `enter`/`leave` callbacks and [`VisitControl`] for
//!   pruning subtrees
//! - [`walk_document`] to drive a depth-first, document-order traversal
//!
//! # Example
//!
//! ```
//! use graphql_apollo_ext::{walk_document, CstNodeRef, CstVisitor, NodeKind, VisitControl};
//!
//! struct TypeNames(Vec<String>);
//!
//! impl CstVisitor for TypeNames {
//!     fn enter(&mut self, node: CstNodeRef<'_>) -> VisitControl {
//!         if node.kind() == NodeKind::ObjectTypeDefinition {
//!             if let Some(name) = node.name() {
//!                 self.0.push(name.text().to_string());
//!             }
//!             // Field definitions are not interesting here
//!             return VisitControl::SkipChildren;
//!         }
//!         VisitControl::Continue
//!     }
//! }
//!
//! let tree = apollo_parser::Parser::new("type User { id: ID } type Post { id: ID }").parse();
//! let mut names = TypeNames(vec![]);
//! walk_document(&mut names, &tree);
//! assert_eq!(names.0, vec!["User", "Post"]);
//! ```

mod visitor;

pub use visitor::*;
