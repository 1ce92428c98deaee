use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{Debug, Formatter},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph: {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge in dependency graph: {:?}", .0)]
    DuplicateEdge(DepRoute<T>),
}

/// A path through the graph, first element is where it starts.
pub struct DepRoute<T> {
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some((last, init)) = self.route.split_last() else {
            return write!(f, "[]");
        };
        for item in init {
            write!(f, "{item:?} -> ")?;
        }
        write!(f, "{last:?}")
    }
}

/// Directed dependency graph. An edge `from -> to` means `to` reads `from`.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    nodes: BTreeSet<Node>,
    edges: BTreeMap<Node, Vec<Node>>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node);
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.edges.entry(from).or_default().push(to);
    }

    fn direct(&self, node: Node) -> &[Node] {
        self.edges.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every node reachable from `node`, not including `node` itself unless
    /// it sits on a cycle.
    pub fn dependents(&self, node: Node) -> BTreeSet<Node> {
        let mut collected = BTreeSet::new();
        let mut queue = VecDeque::from([node]);

        while let Some(current) = queue.pop_front() {
            for &to in self.direct(current) {
                if collected.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        collected
    }

    /// Kahn's algorithm. Ties are broken by node order so the result is stable.
    pub fn topology_order(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut in_degree: BTreeMap<Node, usize> = self.nodes.iter().map(|&n| (n, 0)).collect();

        for (&from, targets) in &self.edges {
            let mut seen = BTreeSet::new();
            for &to in targets {
                if !seen.insert(to) {
                    return Err(TopologyError::DuplicateEdge(DepRoute {
                        route: vec![from, to],
                    }));
                }
                *in_degree.entry(to).or_default() += 1;
            }
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(&n, _)| n)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &to in self.direct(node) {
                if let Some(deg) = in_degree.get_mut(&to) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push_back(to);
                    }
                }
            }
        }

        if order.len() == self.nodes.len() {
            return Ok(order);
        }

        let placed: BTreeSet<Node> = order.into_iter().collect();
        let remaining: Vec<Node> = self
            .nodes
            .iter()
            .copied()
            .filter(|n| !placed.contains(n))
            .collect();
        let route = self.find_cycle(&remaining).unwrap_or(remaining);
        Err(TopologyError::CycleDetected(DepRoute { route }))
    }

    fn find_cycle(&self, nodes: &[Node]) -> Option<Vec<Node>> {
        let mut visited = BTreeSet::new();

        for &start in nodes {
            if visited.contains(&start) {
                continue;
            }

            let mut path = vec![start];
            let mut stack = vec![(start, 0usize)];
            visited.insert(start);

            while let Some((current, next)) = stack.last_mut() {
                let neighbours = self.direct(*current);
                let Some(&neighbour) = neighbours.get(*next) else {
                    stack.pop();
                    path.pop();
                    continue;
                };
                *next += 1;

                if !nodes.contains(&neighbour) {
                    continue;
                }
                if let Some(pos) = path.iter().position(|&n| n == neighbour) {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(neighbour);
                    return Some(cycle);
                }
                if visited.insert(neighbour) {
                    path.push(neighbour);
                    stack.push((neighbour, 0));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_respects_edges() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        graph.route_to(2, 3);
        graph.route_to(1, 3);
        graph.add_node(9);

        let order = graph.topology_order().unwrap();
        let pos = |n| order.iter().position(|&x| x == n).unwrap();

        assert_eq!(order.len(), 4);
        assert!(pos(1) < pos(2));
        assert!(pos(2) < pos(3));
    }

    #[test]
    fn dependents_are_transitive() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        graph.route_to(2, 3);
        graph.route_to(4, 3);

        let deps = graph.dependents(1);
        assert_eq!(deps.into_iter().collect::<Vec<_>>(), vec![2, 3]);
        assert!(graph.dependents(3).is_empty());
    }

    #[test]
    fn cycle_is_reported_as_closed_route() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        graph.route_to(2, 3);
        graph.route_to(3, 1);
        graph.route_to(0, 1);

        match graph.topology_order() {
            Err(TopologyError::CycleDetected(route)) => {
                let nodes = route.nodes();
                assert_eq!(nodes.first(), nodes.last());
                assert_eq!(nodes.len(), 4);

                let msg = TopologyError::CycleDetected(route).to_string();
                assert!(msg.contains("Cycle detected"));
                assert!(msg.contains("->"));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let mut graph: Graph<u32> = Graph::new();
        graph.route_to(1, 2);
        graph.route_to(1, 2);

        match graph.topology_order() {
            Err(TopologyError::DuplicateEdge(route)) => {
                assert_eq!(format!("{route:?}"), "1 -> 2");
            }
            other => panic!("expected duplicate edge, got {other:?}"),
        }
    }
}
