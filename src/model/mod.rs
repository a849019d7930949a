//! Descriptor and area model.
//!
//! Every area starts with two descriptors: the nation and its state.
//! Descriptors are additive, so summing their effects gives the area's
//! derived share of each demographic group:
//!
//! ```text
//! Nation  { white:  0.5   }
//! AL      { white: -0.25  }
//! d17     { white:  0.125 }
//! -------------------------
//! derived { white:  0.375 }
//! ```
//!
//! The [`Atlas`] owns both the [`Registry`] of descriptors and the list of
//! [`Area`]s and keeps each area's score cached.

mod area;
mod atlas;
mod descriptor;
mod registry;

pub use area::Area;
pub use atlas::{Atlas, NATION};
pub use descriptor::{Descriptor, DescriptorId};
pub use registry::Registry;
