mod routes;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use docket_db::Db;
use docket_files::{ObjectStore, UploadPolicy};
use docket_service::LocalService;
use tokio::net::TcpListener;

pub async fn serve(
    listener: TcpListener,
    db: Db,
    store: Arc<dyn ObjectStore>,
    upload_policy: UploadPolicy,
) -> Result<()> {
    let service = LocalService::new(db);
    let app = routes::build_router(service, store, upload_policy);
    axum::serve(listener, app).await?;
    Ok(())
}
