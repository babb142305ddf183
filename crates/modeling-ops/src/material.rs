use tracing::debug;

use phantom_kernel::{MaterialTag, Solid};

/// Tag every solid with `material`.
pub fn apply_material(solids: impl IntoIterator<Item = Solid>, material: &MaterialTag) -> Vec<Solid> {
    let tagged: Vec<Solid> = solids.into_iter().map(|s| s.with_material(material.clone())).collect();
    debug!(material = material.as_str(), count = tagged.len(), "material applied");
    tagged
}

/// Labels of solids that carry no material yet.
pub fn untagged<'a>(solids: impl IntoIterator<Item = &'a Solid>) -> Vec<&'a str> {
    solids
        .into_iter()
        .filter(|s| s.material().is_none())
        .map(|s| s.label())
        .collect()
}
