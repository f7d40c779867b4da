//! # ntt demo
//!
//! Walks a small order tree through the store:
//! 1.  Opens the root entity from [`StoreConfig::from_env`].
//! 2.  Creates an `orders` resource and an order entity.
//! 3.  Saves, reloads and lists the tree.
//!
//! ```bash
//! RUST_LOG=info NTT_STORE_ROOT=./data cargo run
//! ```

use ntt::runtime::{setup_tracing, StoreConfig};
use serde_json::json;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StoreConfig::from_env();
    info!(?config, "Starting ntt demo");

    let result = async {
        let root = config.open().await?;
        let orders = root.create_resource("orders").await?;
        let order = orders.create_entity_with_id(42).await?;
        order.save(&json!({ "id": order.id(), "total": 10 })).await?;

        let reloaded = root.get_resource("orders").await?.get_entity(42).await?.load().await?;
        info!(%reloaded, "Order reloaded");

        let mut cursor = root.iterate_resources().await?;
        while let Some(resource) = cursor.next().await {
            let resource = resource?;
            let entities = resource.list_entities().await?;
            info!(resource = resource.name(), entities = entities.len(), "Resource");
        }
        Ok::<_, ntt::StoreError>(reloaded)
    }
    .instrument(tracing::info_span!("order_demo"))
    .await;

    match result {
        Ok(document) => {
            println!("{document}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Demo failed");
            Err(e.to_string())
        }
    }
}
