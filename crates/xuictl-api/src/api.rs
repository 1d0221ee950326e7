// Panel API facade
//
// One HTTP client, one session, three endpoint groups. Logging in through
// the facade authenticates every group at once.

use url::Url;

use crate::client::PanelClient;
use crate::clients::ClientApi;
use crate::config::PanelConfig;
use crate::database::DatabaseApi;
use crate::error::Error;
use crate::inbounds::InboundApi;
use crate::session::Session;

/// Entry point for the async API.
///
/// ```no_run
/// # async fn run() -> Result<(), xuictl_api::Error> {
/// use secrecy::SecretString;
/// use xuictl_api::{Api, PanelConfig};
///
/// let config = PanelConfig::new("https://panel.example.com:2053", "admin", SecretString::from("admin"));
/// let api = Api::connect(config).await?;
/// for inbound in api.inbound.get_list().await? {
///     println!("{} {}", inbound.id, inbound.remark);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    pub inbound: InboundApi,
    pub client: ClientApi,
    pub database: DatabaseApi,
    engine: PanelClient,
}

impl Api {
    /// Build the facade without contacting the panel.
    pub fn new(config: PanelConfig) -> Result<Self, Error> {
        Url::parse(&config.host)?;
        let session = Session::new(&config.host, config.username, config.password);
        session.set_max_retries(config.max_retries);
        let engine = PanelClient::new(session, &config.transport)?;
        Ok(Self::from_client(engine))
    }

    /// Wrap an existing engine; its session is shared by every group.
    pub fn from_client(engine: PanelClient) -> Self {
        Self {
            inbound: InboundApi::new(engine.clone()),
            client: ClientApi::new(engine.clone()),
            database: DatabaseApi::new(engine.clone()),
            engine,
        }
    }

    /// [`Api::new`] followed by [`Api::login`].
    pub async fn connect(config: PanelConfig) -> Result<Self, Error> {
        let api = Self::new(config)?;
        api.login().await?;
        Ok(api)
    }

    pub async fn login(&self) -> Result<(), Error> {
        self.engine.login().await
    }

    pub fn logout(&self) {
        self.engine.logout();
    }

    pub fn session(&self) -> &Session {
        self.engine.session()
    }

    pub fn engine(&self) -> &PanelClient {
        &self.engine
    }

    pub fn max_retries(&self) -> u32 {
        self.session().max_retries()
    }

    pub fn set_max_retries(&self, max_retries: u32) {
        self.session().set_max_retries(max_retries);
    }
}
