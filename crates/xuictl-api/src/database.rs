// Database endpoints

use tracing::info;

use crate::client::PanelClient;
use crate::error::Error;
use crate::session::Session;

const CREATE_BACKUP: &str = "panel/api/inbounds/createbackup";

/// Panel database operations.
#[derive(Debug, Clone)]
pub struct DatabaseApi {
    client: PanelClient,
}

impl DatabaseApi {
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Ask the panel to export its database to the configured backup
    /// channel (the panel's Telegram bot). Nothing is returned here.
    ///
    /// `GET panel/api/inbounds/createbackup`
    pub async fn export(&self) -> Result<(), Error> {
        info!("exporting database");
        self.client.get_object(CREATE_BACKUP).await?;
        Ok(())
    }
}
