use anyhow::Context;
use log::info;
use nest_api::{
    expires::parse_expires,
    session::{ACCESS_TOKEN_VAR, EXPIRES_IN_VAR, TRANSPORT_URL_VAR, USER_ID_VAR},
    AccessToken, StoredSession,
};

#[derive(Clone, Debug, clap::Parser)]
pub struct SaveSessionCommand {
    /// Base URL that authenticated requests are sent to by default.
    #[arg(long, env = TRANSPORT_URL_VAR)]
    transport_url: String,
    #[arg(long, env = USER_ID_VAR)]
    user_id: String,
    #[arg(long, env = ACCESS_TOKEN_VAR, hide_env_values = true)]
    access_token: String,
    /// When the session expires, e.g. `Tue, 21-Oct-2025 09:30:00 GMT`.
    #[arg(long, env = EXPIRES_IN_VAR)]
    expires_in: Option<String>,
}

impl SaveSessionCommand {
    pub fn exec(self) -> anyhow::Result<()> {
        let Self {
            transport_url,
            user_id,
            access_token,
            expires_in,
        } = self;
        let expires_in = expires_in
            .as_deref()
            .map(parse_expires)
            .transpose()
            .context("Invalid expiry")?;
        let session = StoredSession {
            transport_url,
            user_id,
            access_token: AccessToken::new(access_token),
            expires_in,
        };
        let path = session.to_fs()?;
        info!("Stored session in {path:?}");
        Ok(())
    }
}
