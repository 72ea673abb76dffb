use tracing::debug;

use crate::structures::{
    TransitNetwork,
    plan::{Plan, PlanBusLeg, PlanBusStat, PlanItem, PlanStopBuses, PlanWaitLeg},
};

pub struct RouteQuery {
    pub from: String,
    pub to: String,
}

/// Fastest trip between two named stops.
///
/// Returns `None` when either stop is unknown or no bus connects them. A trip
/// from a stop to itself is an empty plan.
pub fn route(network: &TransitNetwork, query: &RouteQuery) -> Option<Plan> {
    let catalogue = network.catalogue();
    let router = network.router();
    let graph = router.graph();

    let from = catalogue.stop_id(&query.from)?;
    let to = catalogue.stop_id(&query.to)?;

    let info = match router.find_route(
        graph.vertices().vertex(from),
        graph.vertices().vertex(to),
    ) {
        Some(info) => info,
        None => {
            debug!("No route from '{}' to '{}'", query.from, query.to);
            return None;
        }
    };

    let wait = network.routing_settings().bus_wait_time;
    let mut items = Vec::with_capacity(info.edges.len() * 2);
    for edge_id in info.edges {
        let edge = graph.get_edge(edge_id)?;
        let stop = catalogue.stop(graph.vertices().stop(edge.from))?;
        let bus = catalogue.bus(edge.bus)?;

        items.push(PlanItem::Wait(PlanWaitLeg {
            stop_name: stop.name.clone(),
            time: f64::from(wait),
        }));
        items.push(PlanItem::Bus(PlanBusLeg {
            bus: bus.name.clone(),
            span_count: edge.span_count,
            time: edge.weight - f64::from(wait),
        }));
    }

    Some(Plan {
        total_time: info.weight,
        items,
    })
}

pub fn bus_stat(network: &TransitNetwork, name: &str) -> Option<PlanBusStat> {
    let catalogue = network.catalogue();
    let bus = catalogue.bus(catalogue.bus_id(name)?)?;

    let route_length = catalogue.route_length(bus);
    let geo_length = catalogue.route_geo_length(bus);

    let curvature = route_length as f64 / geo_length;
    Some(PlanBusStat {
        curvature: curvature.is_finite().then_some(curvature),
        route_length,
        stop_count: bus.route.len(),
        unique_stop_count: bus.unique_stops,
    })
}

/// Names of the buses through a stop, sorted. Empty for a stop no bus serves.
pub fn stop_buses(network: &TransitNetwork, name: &str) -> Option<PlanStopBuses> {
    let catalogue = network.catalogue();
    let stop = catalogue.stop_id(name)?;

    let buses = catalogue
        .buses_for_stop(stop)
        .iter()
        .filter_map(|&id| catalogue.bus(id))
        .map(|bus| bus.name.clone())
        .collect();

    Some(PlanStopBuses {
        name: name.to_string(),
        buses,
    })
}
