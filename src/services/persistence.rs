use std::{fs, path::Path};

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    routing::{RouteInternalData, Router},
    structures::{
        Bus, Catalogue, EdgeData, EdgeID, LatLng, RenderSettings, RouteGraph,
        RoutingSettings, StopID, TransitNetwork, VertexID, VertexIndex,
    },
};

const NO_EDGE: i64 = -1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Encode(postcard::Error),
    #[error("Failed to deserialize snapshot: {0}")]
    Decode(postcard::Error),
    #[error("Malformed snapshot: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StopRecord {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BusRecord {
    name: String,
    /// Indices into the stop list.
    stops: Vec<u32>,
    is_roundtrip: bool,
    unique_stops: u32,
    start: Option<u32>,
    end: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DistanceRecord {
    from: u32,
    to: u32,
    meters: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EdgeRecord {
    from: u32,
    to: u32,
    weight: f64,
    bus: u32,
    span_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RouteCellRecord {
    has_value: bool,
    weight: f64,
    /// `NO_EDGE` when the cell has no previous edge.
    prev_edge: i64,
}

/// Everything the serve phase needs, in one record. Stops are stored in vertex
/// order and every cross reference is an index into one of the lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SnapshotRecord {
    stops: Vec<StopRecord>,
    buses: Vec<BusRecord>,
    distances: Vec<DistanceRecord>,
    edges: Vec<EdgeRecord>,
    routes: Vec<RouteCellRecord>,
    render_settings: RenderSettings,
    routing_settings: RoutingSettings,
}

fn index(i: usize) -> Result<u32, SnapshotError> {
    u32::try_from(i).map_err(|_| SnapshotError::Malformed(format!("index {i} does not fit in 32 bits")))
}

impl SnapshotRecord {
    fn from_network(network: &TransitNetwork) -> Result<SnapshotRecord, SnapshotError> {
        let catalogue = network.catalogue();
        let router = network.router();
        let graph = router.graph();
        let vertices = graph.vertices();

        let stop_index = |stop: StopID| index(vertices.vertex(stop).0);

        let stops = vertices
            .stops()
            .iter()
            .filter_map(|&id| catalogue.stop(id))
            .map(|stop| StopRecord {
                name: stop.name.clone(),
                latitude: stop.lat_lng.latitude,
                longitude: stop.lat_lng.longitude,
            })
            .collect();

        // Bus ids are positions in this list, in name order.
        let mut bus_position = vec![0; catalogue.bus_count()];
        for (pos, (id, _)) in catalogue.buses().enumerate() {
            bus_position[id.0] = index(pos)?;
        }

        let mut buses = Vec::with_capacity(catalogue.bus_count());
        for (_, bus) in catalogue.buses() {
            buses.push(BusRecord {
                name: bus.name.clone(),
                stops: bus
                    .route
                    .iter()
                    .map(|&s| stop_index(s))
                    .collect::<Result<_, _>>()?,
                is_roundtrip: bus.is_roundtrip,
                unique_stops: index(bus.unique_stops)?,
                start: bus.start_stop.map(stop_index).transpose()?,
                end: bus.end_stop.map(stop_index).transpose()?,
            });
        }

        let mut distances = Vec::new();
        for (from, to, meters) in catalogue.distances() {
            distances.push(DistanceRecord {
                from: stop_index(from)?,
                to: stop_index(to)?,
                meters,
            });
        }
        distances.sort_by_key(|d| (d.from, d.to));

        let mut edges = Vec::with_capacity(graph.edge_count());
        for e in graph.edges() {
            edges.push(EdgeRecord {
                from: index(e.from.0)?,
                to: index(e.to.0)?,
                weight: e.weight,
                bus: bus_position[e.bus.0],
                span_count: e.span_count,
            });
        }

        let mut routes = Vec::with_capacity(router.routes_internal_data().len());
        for cell in router.routes_internal_data() {
            routes.push(match cell {
                Some(data) => RouteCellRecord {
                    has_value: true,
                    weight: data.weight,
                    prev_edge: match data.prev_edge {
                        Some(e) => i64::from(index(e.0)?),
                        None => NO_EDGE,
                    },
                },
                None => RouteCellRecord {
                    has_value: false,
                    weight: 0.0,
                    prev_edge: NO_EDGE,
                },
            });
        }

        Ok(SnapshotRecord {
            stops,
            buses,
            distances,
            edges,
            routes,
            render_settings: network.render_settings().clone(),
            routing_settings: *network.routing_settings(),
        })
    }

    /// Checks every index before anything is built, so a bad file never yields
    /// a half populated network.
    fn validate(&self) -> Result<(), SnapshotError> {
        let n = self.stops.len();
        let stop_ok = |i: u32| (i as usize) < n;

        let mut names: Vec<&str> = self.stops.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(SnapshotError::Malformed("duplicate stop name".to_string()));
        }

        for bus in &self.buses {
            let refs = bus.stops.iter().chain(bus.start.iter()).chain(bus.end.iter());
            if let Some(bad) = refs.copied().find(|&i| !stop_ok(i)) {
                return Err(SnapshotError::Malformed(format!(
                    "bus '{}' references stop {bad} of {n}",
                    bus.name
                )));
            }
        }

        for d in &self.distances {
            if !stop_ok(d.from) || !stop_ok(d.to) {
                return Err(SnapshotError::Malformed(format!(
                    "distance {} -> {} out of range",
                    d.from, d.to
                )));
            }
        }

        for (i, e) in self.edges.iter().enumerate() {
            if !stop_ok(e.from) || !stop_ok(e.to) || (e.bus as usize) >= self.buses.len() {
                return Err(SnapshotError::Malformed(format!("edge {i} out of range")));
            }
        }

        if self.routes.len() != n * n {
            return Err(SnapshotError::Malformed(format!(
                "route table has {} cells, expected {}",
                self.routes.len(),
                n * n
            )));
        }
        // Predecessor vertex of every populated off-diagonal cell.
        let mut pred_of: Vec<Option<usize>> = vec![None; self.routes.len()];
        for (i, cell) in self.routes.iter().enumerate() {
            let (from, to) = (i / n, i % n);
            if from == to {
                if !cell.has_value || cell.prev_edge != NO_EDGE || cell.weight != 0.0 {
                    return Err(SnapshotError::Malformed(format!(
                        "route cell {i} on the diagonal is not empty"
                    )));
                }
                continue;
            }
            if !cell.has_value {
                continue;
            }
            let e = usize::try_from(cell.prev_edge).map_err(|_| {
                SnapshotError::Malformed(format!("route cell {i} has no previous edge"))
            })?;
            let edge = self.edges.get(e).ok_or_else(|| {
                SnapshotError::Malformed(format!("route cell {i} references edge {e}"))
            })?;
            let pred = &self.routes[from * n + edge.from as usize];
            if edge.to as usize != to || !pred.has_value || pred.weight + edge.weight != cell.weight
            {
                return Err(SnapshotError::Malformed(format!(
                    "route cell {i} is not reachable through edge {e}"
                )));
            }
            pred_of[i] = Some(edge.from as usize);
        }

        // Every chain of previous edges has to end on the diagonal.
        const UNSEEN: u8 = 0;
        const WALKING: u8 = 1;
        const DONE: u8 = 2;
        for from in 0..n {
            let mut state = vec![UNSEEN; n];
            state[from] = DONE;
            for to in 0..n {
                let mut walked = Vec::new();
                let mut current = to;
                while state[current] == UNSEEN {
                    let Some(pred) = pred_of[from * n + current] else {
                        break;
                    };
                    state[current] = WALKING;
                    walked.push(current);
                    current = pred;
                }
                if state[current] == WALKING {
                    return Err(SnapshotError::Malformed(format!(
                        "route table has a cycle from vertex {from} through vertex {current}"
                    )));
                }
                for v in walked {
                    state[v] = DONE;
                }
            }
        }

        Ok(())
    }

    fn into_network(self) -> Result<TransitNetwork, SnapshotError> {
        self.validate()?;

        let mut catalogue = Catalogue::new();
        let stop_ids: Vec<StopID> = self
            .stops
            .iter()
            .map(|s| catalogue.add_stop(&s.name, LatLng::new(s.latitude, s.longitude)))
            .collect();
        let resolve = |i: u32| stop_ids[i as usize];

        let mut bus_ids = Vec::with_capacity(self.buses.len());
        for record in &self.buses {
            let id = catalogue.insert_bus(Bus {
                name: record.name.clone(),
                route: record.stops.iter().map(|&i| resolve(i)).collect(),
                is_roundtrip: record.is_roundtrip,
                unique_stops: record.unique_stops as usize,
                start_stop: record.start.map(resolve),
                end_stop: record.end.map(resolve),
            });
            bus_ids.push(id);
        }

        for d in &self.distances {
            catalogue.set_distance(resolve(d.from), resolve(d.to), d.meters);
        }

        let mut graph = RouteGraph::new(VertexIndex::from_order(stop_ids.clone()));
        for e in &self.edges {
            graph.add_edge(EdgeData {
                from: VertexID(e.from as usize),
                to: VertexID(e.to as usize),
                weight: e.weight,
                bus: bus_ids[e.bus as usize],
                span_count: e.span_count,
            });
        }

        let routes = self
            .routes
            .iter()
            .map(|cell| {
                cell.has_value.then(|| RouteInternalData {
                    weight: cell.weight,
                    prev_edge: usize::try_from(cell.prev_edge).ok().map(EdgeID),
                })
            })
            .collect();

        let router = Router::from_parts(graph, routes);
        Ok(TransitNetwork::from_parts(
            catalogue,
            router,
            self.routing_settings,
            self.render_settings,
        ))
    }
}

/// Serializes a network into snapshot bytes.
pub fn encode_network(network: &TransitNetwork) -> Result<Vec<u8>, SnapshotError> {
    to_allocvec(&SnapshotRecord::from_network(network)?).map_err(SnapshotError::Encode)
}

/// Restores a network from snapshot bytes without recomputing anything.
pub fn decode_network(bytes: &[u8]) -> Result<TransitNetwork, SnapshotError> {
    let record: SnapshotRecord = from_bytes(bytes).map_err(SnapshotError::Decode)?;
    record.into_network()
}

/// Writes the snapshot next to `path` and renames it into place.
pub fn save_network(network: &TransitNetwork, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let bytes = encode_network(network)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    info!("Snapshot saved to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub fn load_network(path: impl AsRef<Path>) -> Result<TransitNetwork, SnapshotError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let network = decode_network(&bytes)?;
    info!(
        "Snapshot restored from {}: {} stops, {} buses",
        path.display(),
        network.catalogue().stop_count(),
        network.catalogue().bus_count()
    );
    Ok(network)
}
