use anyhow::Result;
use tracing::{info, trace};

use crate::config::get_database_url;

use super::{init_database, serve};

pub async fn migrate_and_serve() -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    dotenvy::dotenv().ok();
    let database_url = get_database_url();

    init_database(&database_url).await?;
    serve().await?;

    Ok(())
}
