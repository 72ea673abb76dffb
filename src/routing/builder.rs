use tracing::info;

use crate::structures::{Catalogue, EdgeData, RouteGraph, RoutingSettings, VertexIndex};

/// Turns the catalogue into the routing graph.
///
/// Every bus contributes one edge per (boarding stop, alighting stop) pair along
/// its route. Boarding on the outbound half of a linear route only reaches the
/// turnaround stop; the way back is covered by boardings on the return half.
pub fn build_graph(catalogue: &Catalogue, settings: &RoutingSettings) -> RouteGraph {
    let vertices = VertexIndex::from_catalogue(catalogue);
    let mut graph = RouteGraph::new(vertices);

    let velocity = settings.velocity_m_per_min();
    let wait = f64::from(settings.bus_wait_time);

    for (bus_id, bus) in catalogue.buses() {
        let route = &bus.route;
        let midpoint = bus.midpoint();

        for from in 0..route.len() {
            let origin = graph.vertices().vertex(route[from]);
            let mut ride = 0.0;
            let mut span_count = 0;

            for to in from + 1..route.len() {
                ride += f64::from(catalogue.distance(route[to - 1], route[to])) / velocity;
                span_count += 1;

                if route[from] != route[to] {
                    let destination = graph.vertices().vertex(route[to]);
                    graph.add_edge(EdgeData {
                        from: origin,
                        to: destination,
                        weight: ride + wait,
                        bus: bus_id,
                        span_count,
                    });
                }

                if midpoint == Some(to) {
                    break;
                }
            }
        }
    }

    info!(
        "Routing graph built: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    graph
}
