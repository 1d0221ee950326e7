// Inbound endpoints
//
// CRUD and traffic resets under `panel/api/inbounds/`.

use serde_json::json;
use tracing::info;

use crate::client::{PanelClient, decode, decode_list};
use crate::error::Error;
use crate::model::Inbound;
use crate::session::Session;

const LIST: &str = "panel/api/inbounds/list";
const GET: &str = "panel/api/inbounds/get";
const ADD: &str = "panel/api/inbounds/add";
const DELETE: &str = "panel/api/inbounds/del";
const UPDATE: &str = "panel/api/inbounds/update";
const RESET_ALL_TRAFFICS: &str = "panel/api/inbounds/resetAllTraffics";
const RESET_ALL_CLIENT_TRAFFICS: &str = "panel/api/inbounds/resetAllClientTraffics";

/// Inbound operations.
#[derive(Debug, Clone)]
pub struct InboundApi {
    client: PanelClient,
}

impl InboundApi {
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Every inbound with its settings and per-client traffic.
    ///
    /// `GET panel/api/inbounds/list`
    pub async fn get_list(&self) -> Result<Vec<Inbound>, Error> {
        info!("getting inbounds");
        match self.client.get_object(LIST).await? {
            Some(obj) => decode_list(obj),
            None => Ok(Vec::new()),
        }
    }

    /// One inbound, or `None` when the panel returns no object.
    ///
    /// `GET panel/api/inbounds/get/{id}`
    pub async fn get_by_id(&self, inbound_id: i64) -> Result<Option<Inbound>, Error> {
        info!(inbound_id, "getting inbound");
        self.client
            .get_object(&format!("{GET}/{inbound_id}"))
            .await?
            .map(decode)
            .transpose()
    }

    /// `POST panel/api/inbounds/add`
    pub async fn add(&self, inbound: &Inbound) -> Result<(), Error> {
        let payload = payload(inbound)?;
        info!(port = inbound.port, protocol = %inbound.protocol, remark = %inbound.remark, "adding inbound");
        self.client.post_object(ADD, &payload).await?;
        Ok(())
    }

    /// `POST panel/api/inbounds/del/{id}`
    pub async fn delete(&self, inbound_id: i64) -> Result<(), Error> {
        info!(inbound_id, "deleting inbound");
        self.client
            .post_object(&format!("{DELETE}/{inbound_id}"), &json!({}))
            .await?;
        Ok(())
    }

    /// Replace an inbound's editable fields and blocks.
    ///
    /// `POST panel/api/inbounds/update/{id}`
    pub async fn update(&self, inbound_id: i64, inbound: &Inbound) -> Result<(), Error> {
        let payload = payload(inbound)?;
        info!(inbound_id, "updating inbound");
        self.client
            .post_object(&format!("{UPDATE}/{inbound_id}"), &payload)
            .await?;
        Ok(())
    }

    /// Zero the traffic counters of every inbound.
    ///
    /// `POST panel/api/inbounds/resetAllTraffics`
    pub async fn reset_stats(&self) -> Result<(), Error> {
        info!("resetting traffic of all inbounds");
        self.client
            .post_object(RESET_ALL_TRAFFICS, &json!({}))
            .await?;
        Ok(())
    }

    /// Zero the traffic counters of every client on one inbound.
    ///
    /// `POST panel/api/inbounds/resetAllClientTraffics/{id}`
    pub async fn reset_client_stats(&self, inbound_id: i64) -> Result<(), Error> {
        info!(inbound_id, "resetting client traffic of inbound");
        self.client
            .post_object(&format!("{RESET_ALL_CLIENT_TRAFFICS}/{inbound_id}"), &json!({}))
            .await?;
        Ok(())
    }
}

fn payload(inbound: &Inbound) -> Result<serde_json::Value, Error> {
    inbound
        .to_wire_payload()
        .map_err(|e| Error::InvalidInput(format!("cannot encode inbound: {e}")))
}
