//! Reversible edits produced by the mutation operators.

use std::fmt;

use crate::model::{Atlas, DescriptorId};

/// The two kinds of mutation, applied in this order each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Perturb one descriptor's effect on one group.
    Reweight,
    /// Attach or detach one tunable descriptor on one area.
    Membership,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::Reweight, Operator::Membership];

    /// One-letter tag used in progress output.
    pub fn tag(self) -> char {
        match self {
            Operator::Reweight => 'D',
            Operator::Membership => 'C',
        }
    }
}

/// How a membership edit changed an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    /// The descriptor was appended to the area.
    Attached,
    /// The descriptor was removed from `position` in the area's list.
    Detached { position: usize },
}

/// A mutation that has already been applied to an [`Atlas`], carrying
/// enough of the prior state to reverse it exactly.
///
/// Undo must run before any other mutation touches the atlas.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Reweight {
        descriptor: DescriptorId,
        group: String,
        before: f64,
        after: f64,
    },
    Toggle {
        area: usize,
        descriptor: DescriptorId,
        change: MembershipChange,
    },
}

impl Edit {
    /// The operator that produced this edit.
    pub fn operator(&self) -> Operator {
        match self {
            Edit::Reweight { .. } => Operator::Reweight,
            Edit::Toggle { .. } => Operator::Membership,
        }
    }

    /// Reverts the edit and rescores the areas it touched.
    pub fn undo(&self, atlas: &mut Atlas) {
        match *self {
            Edit::Reweight {
                descriptor,
                ref group,
                before,
                ..
            } => {
                atlas.registry_mut().get_mut(descriptor).set_effect(group, before);
                atlas.rescore_where_attached(descriptor);
            }
            Edit::Toggle {
                area,
                descriptor,
                change,
            } => {
                match change {
                    MembershipChange::Attached => {
                        atlas.area_mut(area).detach(descriptor);
                    }
                    MembershipChange::Detached { position } => {
                        atlas.area_mut(area).attach_at(descriptor, position);
                    }
                }
                atlas.score_area(area);
            }
        }
    }

    /// Applies the edit again after an [`undo`](Self::undo).
    pub fn redo(&self, atlas: &mut Atlas) {
        match *self {
            Edit::Reweight {
                descriptor,
                ref group,
                after,
                ..
            } => {
                atlas.registry_mut().get_mut(descriptor).set_effect(group, after);
                atlas.rescore_where_attached(descriptor);
            }
            Edit::Toggle {
                area,
                descriptor,
                change,
            } => {
                match change {
                    MembershipChange::Attached => {
                        atlas.area_mut(area).attach(descriptor);
                    }
                    MembershipChange::Detached { .. } => {
                        atlas.area_mut(area).detach(descriptor);
                    }
                }
                atlas.score_area(area);
            }
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Reweight {
                descriptor,
                group,
                before,
                after,
            } => write!(
                f,
                "reweight descriptor {} on {group}: {before} -> {after}",
                descriptor.index()
            ),
            Edit::Toggle {
                area,
                descriptor,
                change,
            } => {
                let verb = match change {
                    MembershipChange::Attached => "attach",
                    MembershipChange::Detached { .. } => "detach",
                };
                write!(f, "{verb} descriptor {} on area {area}", descriptor.index())
            }
        }
    }
}
