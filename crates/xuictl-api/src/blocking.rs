// Blocking facade
//
// Drives the async API on a private current-thread runtime. Same paths,
// same retries, same errors. Must not be called from inside an async
// context: `block_on` panics there.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::config::PanelConfig;
use crate::error::Error;
use crate::model::{Client, Inbound};
use crate::session::Session;

/// Synchronous counterpart of [`crate::Api`].
#[derive(Debug, Clone)]
pub struct Api {
    pub inbound: InboundApi,
    pub client: ClientApi,
    pub database: DatabaseApi,
    inner: crate::Api,
    rt: Arc<Runtime>,
}

impl Api {
    pub fn new(config: PanelConfig) -> Result<Self, Error> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        let inner = crate::Api::new(config)?;
        Ok(Self::assemble(inner, Arc::new(rt)))
    }

    pub fn connect(config: PanelConfig) -> Result<Self, Error> {
        let api = Self::new(config)?;
        api.login()?;
        Ok(api)
    }

    fn assemble(inner: crate::Api, rt: Arc<Runtime>) -> Self {
        Self {
            inbound: InboundApi {
                inner: inner.inbound.clone(),
                rt: Arc::clone(&rt),
            },
            client: ClientApi {
                inner: inner.client.clone(),
                rt: Arc::clone(&rt),
            },
            database: DatabaseApi {
                inner: inner.database.clone(),
                rt: Arc::clone(&rt),
            },
            inner,
            rt,
        }
    }

    pub fn login(&self) -> Result<(), Error> {
        self.rt.block_on(self.inner.login())
    }

    pub fn logout(&self) {
        self.inner.logout();
    }

    pub fn session(&self) -> &Session {
        self.inner.session()
    }

    pub fn set_max_retries(&self, max_retries: u32) {
        self.inner.set_max_retries(max_retries);
    }
}

/// Blocking [`crate::InboundApi`].
#[derive(Debug, Clone)]
pub struct InboundApi {
    inner: crate::InboundApi,
    rt: Arc<Runtime>,
}

impl InboundApi {
    pub fn get_list(&self) -> Result<Vec<Inbound>, Error> {
        self.rt.block_on(self.inner.get_list())
    }

    pub fn get_by_id(&self, inbound_id: i64) -> Result<Option<Inbound>, Error> {
        self.rt.block_on(self.inner.get_by_id(inbound_id))
    }

    pub fn add(&self, inbound: &Inbound) -> Result<(), Error> {
        self.rt.block_on(self.inner.add(inbound))
    }

    pub fn delete(&self, inbound_id: i64) -> Result<(), Error> {
        self.rt.block_on(self.inner.delete(inbound_id))
    }

    pub fn update(&self, inbound_id: i64, inbound: &Inbound) -> Result<(), Error> {
        self.rt.block_on(self.inner.update(inbound_id, inbound))
    }

    pub fn reset_stats(&self) -> Result<(), Error> {
        self.rt.block_on(self.inner.reset_stats())
    }

    pub fn reset_client_stats(&self, inbound_id: i64) -> Result<(), Error> {
        self.rt.block_on(self.inner.reset_client_stats(inbound_id))
    }
}

/// Blocking [`crate::ClientApi`].
#[derive(Debug, Clone)]
pub struct ClientApi {
    inner: crate::ClientApi,
    rt: Arc<Runtime>,
}

impl ClientApi {
    pub fn get_by_email(&self, email: &str) -> Result<Option<Client>, Error> {
        self.rt.block_on(self.inner.get_by_email(email))
    }

    pub fn get_traffic_by_id(&self, client_uuid: &str) -> Result<Vec<Client>, Error> {
        self.rt.block_on(self.inner.get_traffic_by_id(client_uuid))
    }

    pub fn get_ips(&self, email: &str) -> Result<Option<String>, Error> {
        self.rt.block_on(self.inner.get_ips(email))
    }

    pub fn add(&self, inbound_id: i64, clients: &[Client]) -> Result<(), Error> {
        self.rt.block_on(self.inner.add(inbound_id, clients))
    }

    pub fn update(&self, client_uuid: &str, client: &Client) -> Result<(), Error> {
        self.rt.block_on(self.inner.update(client_uuid, client))
    }

    pub fn reset_ips(&self, email: &str) -> Result<(), Error> {
        self.rt.block_on(self.inner.reset_ips(email))
    }

    pub fn reset_stats(&self, inbound_id: i64, email: &str) -> Result<(), Error> {
        self.rt.block_on(self.inner.reset_stats(inbound_id, email))
    }

    pub fn delete(&self, inbound_id: i64, client_uuid: &str) -> Result<(), Error> {
        self.rt.block_on(self.inner.delete(inbound_id, client_uuid))
    }

    pub fn delete_depleted(&self, inbound_id: i64) -> Result<(), Error> {
        self.rt.block_on(self.inner.delete_depleted(inbound_id))
    }

    pub fn online(&self) -> Result<Vec<String>, Error> {
        self.rt.block_on(self.inner.online())
    }
}

/// Blocking [`crate::DatabaseApi`].
#[derive(Debug, Clone)]
pub struct DatabaseApi {
    inner: crate::DatabaseApi,
    rt: Arc<Runtime>,
}

impl DatabaseApi {
    pub fn export(&self) -> Result<(), Error> {
        self.rt.block_on(self.inner.export())
    }
}
