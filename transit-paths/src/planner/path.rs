//! Path reconstruction from predecessor links.

use crate::network::NodeIndex;

/// Walk predecessor links back from `target` and return the path from
/// `source` to `target`.
///
/// Returns an empty path if the walk does not end at `source` (the target
/// was never reached, or the links belong to a different search). The walk
/// is bounded by the table size, so a cyclic table also yields an empty
/// path rather than looping.
pub fn reconstruct_path(
    predecessors: &[Option<NodeIndex>],
    source: NodeIndex,
    target: NodeIndex,
) -> Vec<NodeIndex> {
    if target.0 >= predecessors.len() {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = predecessors[current.0] {
        if path.len() > predecessors.len() {
            return Vec::new();
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();

    if path.first() == Some(&source) {
        path
    } else {
        Vec::new()
    }
}
