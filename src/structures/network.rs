use crate::{
    routing::{Router, build_graph},
    structures::{Bus, BusID, Catalogue, MapProjection, RenderSettings, RoutingSettings, Stop, StopID},
};

/// Read-only stage of the network: the catalogue together with the routing
/// graph and its precomputed path table.
///
/// Nothing here can be mutated once built, so a network behind an `Arc` is
/// shared by concurrent readers without locking.
#[derive(Debug)]
pub struct TransitNetwork {
    catalogue: Catalogue,
    router: Router,
    routing_settings: RoutingSettings,
    render_settings: RenderSettings,
}

impl TransitNetwork {
    /// Consumes a fully populated catalogue and runs the expensive part of the
    /// build phase.
    pub fn build(
        catalogue: Catalogue,
        routing_settings: RoutingSettings,
        render_settings: RenderSettings,
    ) -> TransitNetwork {
        let graph = build_graph(&catalogue, &routing_settings);
        let router = Router::new(graph);
        TransitNetwork::from_parts(catalogue, router, routing_settings, render_settings)
    }

    /// Assembles a network from already computed parts.
    pub(crate) fn from_parts(
        catalogue: Catalogue,
        router: Router,
        routing_settings: RoutingSettings,
        render_settings: RenderSettings,
    ) -> TransitNetwork {
        TransitNetwork {
            catalogue,
            router,
            routing_settings,
            render_settings,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn routing_settings(&self) -> &RoutingSettings {
        &self.routing_settings
    }

    pub fn render_settings(&self) -> &RenderSettings {
        &self.render_settings
    }

    /// Stops with at least one bus, in name order. Unserved stops still take
    /// part in routing but are not drawn.
    pub fn served_stops(&self) -> Vec<(StopID, &Stop)> {
        self.catalogue
            .stops()
            .filter(|(id, _)| self.catalogue.is_stop_served(*id))
            .collect()
    }

    /// All buses in name order.
    pub fn buses(&self) -> Vec<(BusID, &Bus)> {
        self.catalogue.buses().collect()
    }

    /// Canvas projection fitted to the served stops.
    pub fn map_projection(&self) -> MapProjection {
        let stops = self.served_stops();
        MapProjection::new(stops.iter().map(|(_, s)| &s.lat_lng), &self.render_settings)
    }
}
