// Zone endpoints
//
// Zones are account-scoped; everything else hangs off `/zones/{zone_id}`.

use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::Zone;

impl CloudflareClient {
    /// List the zones visible to the authenticated account.
    ///
    /// `GET /zones` (first page only)
    pub async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        let url = self.url("zones")?;
        debug!("listing zones");
        self.get(url).await
    }
}
