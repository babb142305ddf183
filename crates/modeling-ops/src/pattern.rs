use tracing::{debug, instrument};

use phantom_kernel::operations::placement::Placement;
use phantom_kernel::Solid;

/// Copies of `source`, one per placement, labeled by `label(index)`.
#[instrument(skip_all, fields(source = source.label(), count = placements.len()))]
pub fn instance_pattern(source: &Solid, placements: &[Placement], label: impl Fn(usize) -> String) -> Vec<Solid> {
    let instances: Vec<Solid> = placements
        .iter()
        .enumerate()
        .map(|(i, p)| p.apply(source).with_label(label(i)))
        .collect();
    debug!(instances = instances.len(), "pattern instanced");
    instances
}
