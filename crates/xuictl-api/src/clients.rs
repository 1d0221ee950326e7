// Client endpoints
//
// Provisioning and per-client traffic under `panel/api/inbounds/`. Clients
// live inside an inbound's settings block, so add/update send a
// string-encoded `{"clients": [...]}` document alongside the inbound id.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::{PanelClient, decode, decode_list};
use crate::error::Error;
use crate::model::{Client, json_string};
use crate::session::Session;
use crate::wire::fields;

const GET_CLIENT_TRAFFICS: &str = "panel/api/inbounds/getClientTraffics";
const GET_CLIENT_TRAFFICS_BY_ID: &str = "panel/api/inbounds/getClientTrafficsById";
const CLIENT_IPS: &str = "panel/api/inbounds/clientIps";
const ADD_CLIENT: &str = "panel/api/inbounds/addClient";
const UPDATE_CLIENT: &str = "panel/api/inbounds/updateClient";
const CLEAR_CLIENT_IPS: &str = "panel/api/inbounds/clearClientIps";
const DEL_DEPLETED_CLIENTS: &str = "panel/api/inbounds/delDepletedClients";
const ONLINES: &str = "panel/api/inbounds/onlines";
const INBOUNDS: &str = "panel/api/inbounds";

/// `{"id": <inbound>, "settings": "<json>"}` body of addClient/updateClient.
#[derive(Serialize)]
struct ClientsPayload<'a> {
    id: i64,
    #[serde(serialize_with = "json_string::serialize")]
    settings: ClientList<'a>,
}

#[derive(Serialize)]
struct ClientList<'a> {
    clients: &'a [Client],
}

/// Client operations.
#[derive(Debug, Clone)]
pub struct ClientApi {
    client: PanelClient,
}

impl ClientApi {
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Traffic record for a client, or `None` if no client has that email.
    ///
    /// `GET panel/api/inbounds/getClientTraffics/{email}`
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Client>, Error> {
        info!(email, "getting client traffic");
        // Unknown emails come back as `null` or as an empty object.
        let obj = self
            .client
            .get_object(&format!("{GET_CLIENT_TRAFFICS}/{email}"))
            .await?
            .filter(|v| v.as_object().is_none_or(|o| !o.is_empty()));
        if obj.is_none() {
            warn!(email, "no client found");
        }
        obj.map(decode).transpose()
    }

    /// Traffic records matching a client UUID (one per inbound it is on).
    ///
    /// `GET panel/api/inbounds/getClientTrafficsById/{uuid}`
    pub async fn get_traffic_by_id(&self, client_uuid: &str) -> Result<Vec<Client>, Error> {
        info!(client_uuid, "getting client traffic by id");
        match self
            .client
            .get_object(&format!("{GET_CLIENT_TRAFFICS_BY_ID}/{client_uuid}"))
            .await?
        {
            Some(obj) => decode_list(obj),
            None => Ok(Vec::new()),
        }
    }

    /// Recorded source IPs, or `None` when the panel has none.
    ///
    /// `POST panel/api/inbounds/clientIps/{email}`
    pub async fn get_ips(&self, email: &str) -> Result<Option<String>, Error> {
        info!(email, "getting client IPs");
        let obj = self
            .client
            .post_object(&format!("{CLIENT_IPS}/{email}"), &json!({}))
            .await?;
        Ok(match obj {
            None => None,
            Some(Value::String(s)) if s == fields::NO_IP_RECORD || s.is_empty() => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        })
    }

    /// `POST panel/api/inbounds/addClient`
    pub async fn add(&self, inbound_id: i64, clients: &[Client]) -> Result<(), Error> {
        let body = clients_payload(inbound_id, clients)?;
        info!(count = clients.len(), inbound_id, "adding clients");
        self.client.post_object(ADD_CLIENT, &body).await?;
        Ok(())
    }

    /// Replace a client's settings. `client.inbound_id` selects the inbound.
    ///
    /// `POST panel/api/inbounds/updateClient/{uuid}`
    pub async fn update(&self, client_uuid: &str, client: &Client) -> Result<(), Error> {
        let inbound_id = client.inbound_id.ok_or_else(|| {
            Error::InvalidInput(format!(
                "client '{}' has no inbound_id; set it before updating",
                client.email
            ))
        })?;
        let body = clients_payload(inbound_id, std::slice::from_ref(client))?;
        info!(client_uuid, inbound_id, "updating client");
        self.client
            .post_object(&format!("{UPDATE_CLIENT}/{client_uuid}"), &body)
            .await?;
        Ok(())
    }

    /// `POST panel/api/inbounds/clearClientIps/{email}`
    pub async fn reset_ips(&self, email: &str) -> Result<(), Error> {
        info!(email, "resetting client IPs");
        self.client
            .post_object(&format!("{CLEAR_CLIENT_IPS}/{email}"), &json!({}))
            .await?;
        Ok(())
    }

    /// `POST panel/api/inbounds/{inbound_id}/resetClientTraffic/{email}`
    pub async fn reset_stats(&self, inbound_id: i64, email: &str) -> Result<(), Error> {
        info!(inbound_id, email, "resetting client traffic");
        self.client
            .post_object(
                &format!("{INBOUNDS}/{inbound_id}/resetClientTraffic/{email}"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    /// `POST panel/api/inbounds/{inbound_id}/delClient/{uuid}`
    pub async fn delete(&self, inbound_id: i64, client_uuid: &str) -> Result<(), Error> {
        info!(inbound_id, client_uuid, "deleting client");
        self.client
            .post_object(
                &format!("{INBOUNDS}/{inbound_id}/delClient/{client_uuid}"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    /// Remove clients whose quota or expiry is used up.
    ///
    /// `POST panel/api/inbounds/delDepletedClients/{inbound_id}`
    pub async fn delete_depleted(&self, inbound_id: i64) -> Result<(), Error> {
        info!(inbound_id, "deleting depleted clients");
        self.client
            .post_object(&format!("{DEL_DEPLETED_CLIENTS}/{inbound_id}"), &json!({}))
            .await?;
        Ok(())
    }

    /// Emails of clients currently connected.
    ///
    /// `POST panel/api/inbounds/onlines`
    pub async fn online(&self) -> Result<Vec<String>, Error> {
        info!("getting online clients");
        match self.client.post_object(ONLINES, &json!({})).await? {
            Some(obj) => serde_json::from_value(obj.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: obj.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

fn clients_payload(inbound_id: i64, clients: &[Client]) -> Result<Value, Error> {
    serde_json::to_value(ClientsPayload {
        id: inbound_id,
        settings: ClientList { clients },
    })
    .map_err(|e| Error::InvalidInput(format!("cannot encode clients: {e}")))
}
