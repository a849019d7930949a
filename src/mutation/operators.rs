//! Reweight and membership-toggle operators.

use log::trace;
use rand::Rng;

use super::types::{Edit, MembershipChange};
use crate::model::{Atlas, DescriptorId};

/// Perturbs one effect of one randomly chosen descriptor.
///
/// The descriptor is drawn uniformly from the registry (fixed descriptors
/// only when `include_fixed` is set), the group uniformly from its effect
/// mapping, and the perturbation uniformly from
/// `[-max_delta, +max_delta]`. The new effect is clamped to `[0, 1]`, and
/// every area holding the descriptor is rescored.
///
/// Returns `None` if there is no eligible descriptor or it has no effects.
pub fn reweight<R: Rng>(
    atlas: &mut Atlas,
    max_delta: f64,
    include_fixed: bool,
    rng: &mut R,
) -> Option<Edit> {
    let pool: Vec<DescriptorId> = if include_fixed {
        atlas.registry().iter().map(|(id, _)| id).collect()
    } else {
        atlas.registry().tunable_ids()
    };
    if pool.is_empty() {
        return None;
    }
    let descriptor = pool[rng.random_range(0..pool.len())];

    let effects = atlas.registry().get(descriptor).effects();
    if effects.is_empty() {
        return None;
    }
    let group = effects.keys().nth(rng.random_range(0..effects.len()))?.clone();

    let delta = rng.random_range(-max_delta..=max_delta);
    let entry = atlas.registry_mut().get_mut(descriptor);
    let before = entry.effect_on(&group);
    let after = (before + delta).clamp(0.0, 1.0);
    entry.set_effect(&group, after);
    atlas.rescore_where_attached(descriptor);

    let edit = Edit::Reweight {
        descriptor,
        group,
        before,
        after,
    };
    trace!("{edit}");
    Some(edit)
}

/// Attaches or detaches one random tunable descriptor on one random area.
///
/// If the descriptor is attached it is removed, otherwise appended; the
/// area is then rescored. Returns `None` if there are no areas or no
/// tunable descriptors.
pub fn toggle_membership<R: Rng>(atlas: &mut Atlas, rng: &mut R) -> Option<Edit> {
    if atlas.areas().is_empty() {
        return None;
    }
    let area = rng.random_range(0..atlas.areas().len());

    let tunable = atlas.registry().tunable_ids();
    if tunable.is_empty() {
        return None;
    }
    let descriptor = tunable[rng.random_range(0..tunable.len())];

    let target = atlas.area_mut(area);
    let change = match target.detach(descriptor) {
        Some(position) => MembershipChange::Detached { position },
        None => {
            target.attach(descriptor);
            MembershipChange::Attached
        }
    };
    atlas.score_area(area);

    let edit = Edit::Toggle {
        area,
        descriptor,
        change,
    };
    trace!("{edit}");
    Some(edit)
}
