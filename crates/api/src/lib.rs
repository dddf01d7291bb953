//! Request building for the unofficial Nest API.
mod error;
pub mod expires;
pub mod params;
mod psst;
pub mod request;
pub mod session;

pub use error::{Error, SessionError};
pub use params::{FormValues, Params};
pub use psst::AccessToken;
pub use request::RequestBuilder;
pub use session::{Credentials, Session, StaticSession, StoredSession};
