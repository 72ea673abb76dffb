use std::{cmp::Ordering, cmp::Reverse, time::SystemTime};

use priority_queue::PriorityQueue;
use tracing::{error, info};

use crate::structures::{EdgeID, RouteGraph, VertexID};

/// Best known way to reach a vertex from a fixed source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInternalData {
    pub weight: f64,
    /// Last edge of a minimal path, `None` on the diagonal.
    pub prev_edge: Option<EdgeID>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub weight: f64,
    pub edges: Vec<EdgeID>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Minutes(f64);

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// All-pairs shortest paths over a [`RouteGraph`].
#[derive(Debug, Clone)]
pub struct Router {
    graph: RouteGraph,
    routes: Vec<Option<RouteInternalData>>,
}

impl Router {
    /// Runs one Dijkstra per source vertex and keeps the whole table.
    ///
    /// A cell is only replaced by a strictly lighter path, so among equal
    /// weights the first edge reached during relaxation is kept.
    pub fn new(graph: RouteGraph) -> Router {
        let before = SystemTime::now();
        let n = graph.vertex_count();
        let mut routes = vec![None; n * n];

        for source in 0..n {
            let row = &mut routes[source * n..(source + 1) * n];
            Router::relax_from(&graph, VertexID(source), row);
        }

        if let Ok(elapsed) = before.elapsed() {
            info!(
                "Routes computed for {n} vertices in {}ms",
                elapsed.as_millis()
            );
        }

        Router { graph, routes }
    }

    /// Rebuilds a router from a table computed earlier. The caller guarantees
    /// that `routes` has `vertex_count²` cells and only references existing
    /// edges.
    pub fn from_parts(graph: RouteGraph, routes: Vec<Option<RouteInternalData>>) -> Router {
        debug_assert_eq!(routes.len(), graph.vertex_count() * graph.vertex_count());
        Router { graph, routes }
    }

    fn relax_from(graph: &RouteGraph, source: VertexID, row: &mut [Option<RouteInternalData>]) {
        let mut visited = vec![false; graph.vertex_count()];
        let mut pq = PriorityQueue::<VertexID, Reverse<Minutes>>::new();

        row[source.0] = Some(RouteInternalData {
            weight: 0.0,
            prev_edge: None,
        });
        pq.push(source, Reverse(Minutes(0.0)));

        while let Some((vertex, Reverse(Minutes(weight)))) = pq.pop() {
            visited[vertex.0] = true;

            for &edge_id in graph.outgoing(vertex) {
                let Some(edge) = graph.get_edge(edge_id) else {
                    continue;
                };
                if visited[edge.to.0] {
                    continue;
                }

                let candidate = weight + edge.weight;
                let better = match row[edge.to.0] {
                    Some(current) => candidate < current.weight,
                    None => true,
                };
                if better {
                    row[edge.to.0] = Some(RouteInternalData {
                        weight: candidate,
                        prev_edge: Some(edge_id),
                    });
                    pq.push(edge.to, Reverse(Minutes(candidate)));
                }
            }
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Row-major table, `vertex_count²` cells.
    pub fn routes_internal_data(&self) -> &[Option<RouteInternalData>] {
        &self.routes
    }

    pub fn cell(&self, from: VertexID, to: VertexID) -> Option<&RouteInternalData> {
        let n = self.graph.vertex_count();
        if from.0 >= n || to.0 >= n {
            return None;
        }
        self.routes[from.0 * n + to.0].as_ref()
    }

    /// Lightest path between two vertices, or `None` if `to` is unreachable.
    pub fn find_route(&self, from: VertexID, to: VertexID) -> Option<RouteInfo> {
        if from == to && from.0 < self.graph.vertex_count() {
            return Some(RouteInfo {
                weight: 0.0,
                edges: Vec::new(),
            });
        }

        let target = self.cell(from, to)?;
        let mut edges = Vec::new();
        let mut prev = target.prev_edge;

        while let Some(edge_id) = prev {
            if edges.len() >= self.graph.edge_count() {
                error!("Path table has a cycle between {from} and {to}");
                debug_assert!(false, "cyclic path table");
                return None;
            }
            edges.push(edge_id);
            let edge = self.graph.get_edge(edge_id)?;
            prev = self.cell(from, edge.from)?.prev_edge;
        }

        edges.reverse();
        Some(RouteInfo {
            weight: target.weight,
            edges,
        })
    }
}
