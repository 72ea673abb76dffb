use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Error, Schema, http::GraphiQLSource};
use async_graphql_poem::GraphQL;
use poem::{Route, Server, get, handler, listener::TcpListener, web::Html};
use tracing::info;

use crate::{
    routing::routing::{RouteQuery, bus_stat, route, stop_buses},
    structures::{
        TransitNetwork,
        plan::{Plan, PlanBusStat, PlanStop, PlanStopBuses},
    },
};

pub struct QueryRoot;

pub type TransitSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

#[async_graphql::Object]
impl QueryRoot {
    async fn ping(&self) -> &str {
        "pong"
    }

    /// Route statistics, `null` for an unknown bus.
    async fn bus(&self, ctx: &Context<'_>, name: String) -> Result<Option<PlanBusStat>, Error> {
        let network = ctx.data::<Arc<TransitNetwork>>()?;
        Ok(bus_stat(network, &name))
    }

    /// Buses through a stop, `null` for an unknown stop.
    async fn stop(&self, ctx: &Context<'_>, name: String) -> Result<Option<PlanStopBuses>, Error> {
        let network = ctx.data::<Arc<TransitNetwork>>()?;
        Ok(stop_buses(network, &name))
    }

    /// Fastest trip, `null` when no bus connects the stops.
    async fn route(
        &self,
        ctx: &Context<'_>,
        from: String,
        to: String,
    ) -> Result<Option<Plan>, Error> {
        let network = ctx.data::<Arc<TransitNetwork>>()?;
        Ok(route(network, &RouteQuery { from, to }))
    }

    /// Names of all buses, sorted.
    async fn buses(&self, ctx: &Context<'_>) -> Result<Vec<String>, Error> {
        let network = ctx.data::<Arc<TransitNetwork>>()?;
        Ok(network
            .buses()
            .into_iter()
            .map(|(_, bus)| bus.name.clone())
            .collect())
    }

    /// Stops served by at least one bus.
    async fn stops(&self, ctx: &Context<'_>) -> Result<Vec<PlanStop>, Error> {
        let network = ctx.data::<Arc<TransitNetwork>>()?;
        Ok(network
            .served_stops()
            .into_iter()
            .map(|(_, stop)| PlanStop::from_stop(stop))
            .collect())
    }
}

#[handler]
async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn schema(network: Arc<TransitNetwork>) -> TransitSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(network)
        .finish()
}

pub fn app(network: Arc<TransitNetwork>) -> Route {
    Route::new()
        .at("/graphql", GraphQL::new(schema(network)))
        .at("/graphiql", get(graphiql))
}

pub async fn server(network: Arc<TransitNetwork>, bind: &str) -> std::io::Result<()> {
    info!("Serving on {bind}");
    Server::new(TcpListener::bind(bind.to_string()))
        .run(app(network))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{Catalogue, LatLng, RenderSettings, RoutingSettings};
    use poem::test::TestClient;
    use serde_json::json;

    fn network() -> Arc<TransitNetwork> {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", LatLng::new(0.0, 0.0));
        let b = c.add_stop("B", LatLng::new(0.0, 0.01));
        c.add_stop("C", LatLng::new(0.0, 0.02));
        c.set_distance(a, b, 1000);
        c.add_bus("1", &[a, b], false);
        Arc::new(TransitNetwork::build(
            c,
            RoutingSettings {
                bus_wait_time: 6,
                bus_velocity: 40.0,
            },
            RenderSettings::default(),
        ))
    }

    fn execute(query: &str) -> serde_json::Value {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let response = runtime.block_on(schema(network()).execute(query));
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[test]
    fn route_query() {
        let data = execute(
            r#"{ route(from: "A", to: "B") {
                totalTime
                items {
                    __typename
                    ... on PlanWaitLeg { stopName time }
                    ... on PlanBusLeg { bus spanCount }
                }
            } }"#,
        );
        assert_eq!(
            data["route"]["items"],
            json!([
                {"__typename": "PlanWaitLeg", "stopName": "A", "time": 6.0},
                {"__typename": "PlanBusLeg", "bus": "1", "spanCount": 1},
            ])
        );
        let total = data["route"]["totalTime"].as_f64().unwrap();
        assert!((total - 7.5).abs() < 1e-9);
    }

    #[test]
    fn unreachable_route_is_null() {
        let data = execute(r#"{ route(from: "A", to: "C") { totalTime } }"#);
        assert_eq!(data, json!({"route": null}));
    }

    #[test]
    fn stop_and_bus_queries() {
        let data = execute(
            r#"{
                a: stop(name: "A") { buses }
                c: stop(name: "C") { buses }
                x: stop(name: "X") { buses }
                bus(name: "1") { stopCount uniqueStopCount routeLength }
                missing: bus(name: "2") { stopCount }
                stops { name }
                buses
            }"#,
        );
        assert_eq!(
            data,
            json!({
                "a": {"buses": ["1"]},
                "c": {"buses": []},
                "x": null,
                "bus": {"stopCount": 3, "uniqueStopCount": 2, "routeLength": 2000},
                "missing": null,
                "stops": [{"name": "A"}, {"name": "B"}],
                "buses": ["1"],
            })
        );
    }

    #[test]
    fn graphiql_page() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let cli = TestClient::new(app(network()));
            let resp = cli.get("/graphiql").send().await;
            resp.assert_status_is_ok();
        });
    }
}
