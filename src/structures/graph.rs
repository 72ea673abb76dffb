use crate::structures::{Catalogue, EdgeData, EdgeID, StopID, VertexID};

/// Bijection between catalogue stops and routing vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexIndex {
    stop_of_vertex: Vec<StopID>,
    vertex_of_stop: Vec<VertexID>,
}

impl VertexIndex {
    /// Numbers the stops in the order the catalogue enumerates them (by name).
    pub fn from_catalogue(catalogue: &Catalogue) -> VertexIndex {
        VertexIndex::from_order(catalogue.stops().map(|(id, _)| id).collect())
    }

    /// `order[v]` is the stop of vertex `v`. Must be a permutation of
    /// `0..order.len()`.
    pub fn from_order(order: Vec<StopID>) -> VertexIndex {
        let mut vertex_of_stop = vec![VertexID(usize::MAX); order.len()];
        for (v, stop) in order.iter().enumerate() {
            vertex_of_stop[stop.0] = VertexID(v);
        }
        debug_assert!(vertex_of_stop.iter().all(|v| v.0 != usize::MAX));

        VertexIndex {
            stop_of_vertex: order,
            vertex_of_stop,
        }
    }

    pub fn vertex(&self, stop: StopID) -> VertexID {
        self.vertex_of_stop[stop.0]
    }

    pub fn stop(&self, vertex: VertexID) -> StopID {
        self.stop_of_vertex[vertex.0]
    }

    pub fn len(&self) -> usize {
        self.stop_of_vertex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_of_vertex.is_empty()
    }

    /// Stops in vertex order.
    pub fn stops(&self) -> &[StopID] {
        &self.stop_of_vertex
    }
}

/// Directed weighted multigraph over stop vertices.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    vertices: VertexIndex,
    edges: Vec<EdgeData>,
    outgoing: Vec<Vec<EdgeID>>,
}

impl RouteGraph {
    pub fn new(vertices: VertexIndex) -> RouteGraph {
        RouteGraph {
            outgoing: vec![Vec::new(); vertices.len()],
            vertices,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, edge: EdgeData) -> EdgeID {
        let id = EdgeID(self.edges.len());
        self.outgoing[edge.from.0].push(id);
        self.edges.push(edge);
        id
    }

    pub fn get_edge(&self, id: EdgeID) -> Option<&EdgeData> {
        self.edges.get(id.0)
    }

    pub fn edges(&self) -> &[EdgeData] {
        &self.edges
    }

    pub fn outgoing(&self, vertex: VertexID) -> &[EdgeID] {
        self.outgoing
            .get(vertex.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn vertices(&self) -> &VertexIndex {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{BusID, LatLng};

    #[test]
    fn vertices_follow_name_order() {
        let mut c = Catalogue::new();
        let z = c.add_stop("Z", LatLng::new(0.0, 0.0));
        let a = c.add_stop("A", LatLng::new(0.0, 0.0));
        let m = c.add_stop("M", LatLng::new(0.0, 0.0));

        let index = VertexIndex::from_catalogue(&c);
        assert_eq!(index.vertex(a), VertexID(0));
        assert_eq!(index.vertex(m), VertexID(1));
        assert_eq!(index.vertex(z), VertexID(2));
        for v in 0..3 {
            assert_eq!(index.vertex(index.stop(VertexID(v))), VertexID(v));
        }
    }

    #[test]
    fn outgoing_edges() {
        let index = VertexIndex::from_order(vec![StopID(1), StopID(0)]);
        let mut g = RouteGraph::new(index);
        let edge = EdgeData {
            from: VertexID(1),
            to: VertexID(0),
            weight: 2.5,
            bus: BusID(0),
            span_count: 1,
        };
        let id = g.add_edge(edge);
        assert_eq!(g.outgoing(VertexID(1)), &[id]);
        assert!(g.outgoing(VertexID(0)).is_empty());
        assert_eq!(g.get_edge(id), Some(&edge));
        assert_eq!(g.edge_count(), 1);
    }
}
