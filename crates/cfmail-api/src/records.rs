// DNS record endpoints
//
// All record operations are zone-scoped:
// `/zones/{zone_id}/dns_records[/{record_id}]`.

use tracing::debug;

use crate::client::CloudflareClient;
use crate::error::Error;
use crate::models::{DnsRecord, NewRecord};

impl CloudflareClient {
    /// List the DNS records of a zone, in provider order.
    ///
    /// `GET /zones/{zone_id}/dns_records` (first page only)
    pub async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error> {
        let url = self.url(&format!("zones/{zone_id}/dns_records"))?;
        debug!(zone_id, "listing DNS records");
        self.get(url).await
    }

    /// Create a DNS record and return the provider's copy of it.
    ///
    /// `POST /zones/{zone_id}/dns_records`
    pub async fn create_record(
        &self,
        zone_id: &str,
        record: &NewRecord,
    ) -> Result<DnsRecord, Error> {
        let url = self.url(&format!("zones/{zone_id}/dns_records"))?;
        debug!(
            zone_id,
            name = %record.name,
            record_type = %record.record_type,
            "creating DNS record"
        );
        self.post(url, record).await
    }

    /// Delete a DNS record.
    ///
    /// `DELETE /zones/{zone_id}/dns_records/{record_id}`
    pub async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), Error> {
        let url = self.url(&format!("zones/{zone_id}/dns_records/{record_id}"))?;
        debug!(zone_id, record_id, "deleting DNS record");
        let _: serde_json::Value = self.delete(url).await?;
        Ok(())
    }
}
