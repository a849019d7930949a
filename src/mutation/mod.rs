//! Mutation operators.
//!
//! Each operator edits the [`Atlas`](crate::model::Atlas) in place,
//! rescores the areas it touched, and returns an [`Edit`] that can reverse
//! the change. `None` means the operator's preconditions did not hold and
//! nothing changed.

mod operators;
mod types;

pub use operators::{reweight, toggle_membership};
pub use types::{Edit, MembershipChange, Operator};
