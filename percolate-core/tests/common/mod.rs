use percolate_core::{ClusterTracker, Edge};

/// Parses an edge rendered with its `Display` form, e.g. `"(3, 17)"`.
#[must_use]
pub fn parse_edge(raw: &str) -> Option<Edge> {
    let (left, right) = raw.strip_prefix('(')?.strip_suffix(')')?.split_once(", ")?;
    Some(Edge::new(left.parse().ok()?, right.parse().ok()?))
}

/// Rebuilds the cluster state after the first `steps` committed edges.
#[must_use]
pub fn replay(node_count: usize, edges: &[Edge], steps: usize) -> ClusterTracker {
    let mut tracker = ClusterTracker::new(node_count);
    for edge in edges.iter().take(steps) {
        tracker
            .merge(edge.low(), edge.high())
            .expect("recorded edges merge distinct clusters");
    }
    tracker
}

/// Product of the endpoint cluster sizes of `edge` in `tracker`.
#[must_use]
pub fn size_product(tracker: &ClusterTracker, edge: Edge) -> usize {
    let left = tracker.size_of_node(edge.low()).expect("node in range");
    let right = tracker.size_of_node(edge.high()).expect("node in range");
    left * right
}
