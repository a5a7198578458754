// ── Zone client seam ──
//
// The four remote calls the reconciler needs. `CloudflareClient`
// implements it directly; tests substitute an in-memory zone.

use cfmail_api::{CloudflareClient, DnsRecord, Error, NewRecord, Zone};

/// Remote zone operations consumed by [`reconcile`](crate::reconcile::reconcile).
#[allow(async_fn_in_trait)]
pub trait ZoneApi {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error>;

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error>;

    async fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<DnsRecord, Error>;

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), Error>;
}

impl ZoneApi for CloudflareClient {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        CloudflareClient::list_zones(self).await
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error> {
        CloudflareClient::list_records(self, zone_id).await
    }

    async fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<DnsRecord, Error> {
        CloudflareClient::create_record(self, zone_id, record).await
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), Error> {
        CloudflareClient::delete_record(self, zone_id, record_id).await
    }
}
