use std::time::SystemTime;

use tracing::info;

use crate::{
    ingestion::{IngestionError, cache::resolve_path, description::NetworkDescription},
    structures::{BuildConfig, Catalogue, TransitNetwork},
};

/// Reads the configured network description and runs the whole build phase.
pub fn build_network(config: &BuildConfig) -> Result<TransitNetwork, IngestionError> {
    let path = resolve_path(config)?;
    info!("Loading '{path}'...");
    let description = NetworkDescription::load(&path)?;
    build_from_description(&description)
}

pub fn build_from_description(
    description: &NetworkDescription,
) -> Result<TransitNetwork, IngestionError> {
    let routing_settings = description.routing_settings()?;
    let render_settings = description.render_settings();

    let before = SystemTime::now();
    let mut catalogue = Catalogue::new();
    description.populate(&mut catalogue);

    let network = TransitNetwork::build(catalogue, routing_settings, render_settings);
    if let Ok(elapsed) = before.elapsed() {
        info!("Network built in {}ms", elapsed.as_millis());
    }
    Ok(network)
}
