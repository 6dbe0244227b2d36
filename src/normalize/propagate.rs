use crate::foundation::core::ChannelKey;
use crate::normalize::analysis::DependencyGraph;
use std::collections::BTreeSet;

/// Transitive closure of `seeds` over reader edges.
///
/// A writer whose expression reads a flagged channel becomes flagged, repeated until no flag
/// changes. Edges run writer -> read, so flags travel against edge direction.
pub(crate) fn propagate_flags(
    seeds: &BTreeSet<ChannelKey>,
    graph: &DependencyGraph,
) -> BTreeSet<ChannelKey> {
    let mut flagged = seeds.clone();
    loop {
        let mut changed = false;
        for (writer, reads) in graph {
            if flagged.contains(writer) {
                continue;
            }
            if reads.iter().any(|r| flagged.contains(r)) {
                flagged.insert(writer.clone());
                changed = true;
            }
        }
        if !changed {
            return flagged;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/propagate.rs"]
mod tests;
