//! Facilities for providing the credentials that authenticated requests are built from.
//!
//! Acquiring a session is not handled here; a session obtained elsewhere can be injected either
//! by implementing [`Session`] or by storing it as a [`StoredSession`].
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use log::debug;

use crate::{error::SessionError, expires::parse_expires, psst::AccessToken};

const FILENAME: &str = "nest-session-v0.json";

pub const TRANSPORT_URL_VAR: &str = "NEST_TRANSPORT_URL";
pub const USER_ID_VAR: &str = "NEST_USER_ID";
pub const ACCESS_TOKEN_VAR: &str = "NEST_ACCESS_TOKEN";
pub const EXPIRES_IN_VAR: &str = "NEST_EXPIRES_IN";

/// Point-in-time snapshot of a logged-in session.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Base URL, without trailing slash, that requests with a blank host are sent to.
    pub transport_url: String,
    pub user_id: String,
    pub access_token: AccessToken,
}

/// Read-only access to the current session.
pub trait Session {
    /// Returns the current credentials, or an error if there is no valid session.
    ///
    /// Implementations may block, e.g. to log in.
    fn require_login(&self) -> Result<Credentials, SessionError>;
}

impl<T: Session + ?Sized> Session for &T {
    fn require_login(&self) -> Result<Credentials, SessionError> {
        (**self).require_login()
    }
}

impl<T: Session + ?Sized> Session for std::sync::Arc<T> {
    fn require_login(&self) -> Result<Credentials, SessionError> {
        (**self).require_login()
    }
}

/// A session as it is persisted between runs.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct StoredSession {
    pub transport_url: String,
    pub user_id: String,
    pub access_token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<DateTime<Utc>>,
}

impl StoredSession {
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let Some(transport_url) = env::var_os(TRANSPORT_URL_VAR) else {
            return Ok(None);
        };
        let transport_url = transport_url
            .into_string()
            .map_err(|_| anyhow!("{TRANSPORT_URL_VAR} is not valid unicode"))?;
        let user_id = env::var(USER_ID_VAR).with_context(|| format!("Reading {USER_ID_VAR}"))?;
        let access_token = env::var(ACCESS_TOKEN_VAR)
            .map(AccessToken::new)
            .with_context(|| format!("Reading {ACCESS_TOKEN_VAR}"))?;
        let expires_in = env::var(EXPIRES_IN_VAR)
            .ok()
            .map(|s| parse_expires(&s))
            .transpose()
            .with_context(|| format!("Parsing {EXPIRES_IN_VAR}"))?;
        debug!("Loaded session for user {user_id} from env");
        Ok(Some(Self {
            transport_url,
            user_id,
            access_token,
            expires_in,
        }))
    }

    fn dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::data_dir()
            .context("Could not infer a data directory")?
            .join("nest-api"))
    }

    pub fn from_fs() -> anyhow::Result<Option<Self>> {
        Self::from_dir(&Self::dir()?)
    }

    pub fn from_dir(dir: &Path) -> anyhow::Result<Option<Self>> {
        let file = dir.join(FILENAME);
        match fs::read_to_string(&file) {
            Ok(t) => serde_json::from_str(&t)
                .context("Failed to deserialize session")
                .with_context(|| format!("Consider removing {file:?}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!(e)),
        }
    }

    /// Look for a session in the environment first and on the file system second.
    pub fn from_anywhere() -> anyhow::Result<Option<Self>> {
        if let Some(session) = Self::from_env()? {
            return Ok(Some(session));
        }
        Self::from_fs()
    }

    pub fn to_fs(&self) -> anyhow::Result<PathBuf> {
        self.to_dir(&Self::dir()?)
    }

    pub fn to_dir(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let session = serde_json::to_string_pretty(&self).context("Failed to serialize session")?;
        fs::create_dir_all(dir).context("Failed to create the data directory")?;
        let destination = dir.join(FILENAME);
        fs::write(&destination, session)
            .with_context(|| format!("Failed to write {destination:?}"))?;
        Ok(destination)
    }
}

/// A session that never changes, e.g. one loaded from the environment or file system.
#[derive(Clone, Debug, Default)]
pub struct StaticSession {
    stored: Option<StoredSession>,
}

impl StaticSession {
    pub fn new(stored: StoredSession) -> Self {
        Self {
            stored: Some(stored),
        }
    }

    pub fn logged_out() -> Self {
        Self { stored: None }
    }

    pub fn from_anywhere() -> anyhow::Result<Self> {
        Ok(Self {
            stored: StoredSession::from_anywhere()?,
        })
    }
}

impl Session for StaticSession {
    fn require_login(&self) -> Result<Credentials, SessionError> {
        let Some(stored) = self.stored.as_ref() else {
            return Err(SessionError::LoggedOut);
        };
        if let Some(expired_at) = stored.expires_in {
            if expired_at <= Utc::now() {
                return Err(SessionError::Expired { expired_at });
            }
        }
        Ok(Credentials {
            transport_url: stored.transport_url.clone(),
            user_id: stored.user_id.clone(),
            access_token: stored.access_token.clone(),
        })
    }
}
