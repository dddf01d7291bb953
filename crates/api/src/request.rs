//! Facilities for building requests that the API will accept.
//!
//! The API is not public and rejects clients it does not recognize, so every request carries the
//! user agent of an official client. Authenticated requests additionally carry the credentials of
//! the current [`Session`] in a set of headers that is either added in full or not at all.
use std::borrow::Cow;

use log::{debug, trace};
use reqwest::{
    header::{HeaderName, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Method, Request,
};
use serde::Serialize;
use url::Url;

use crate::{
    error::Error,
    params::{FormValues, Params},
    session::Session,
};

pub const DEFAULT_USER_AGENT: &str = "Nest/3.0.15 (iOS) os=6.0 platform=iPad3,1";
pub const PROTOCOL_VERSION: &str = "1";
pub const LANGUAGE: &str = "en";

pub const X_NL_USER_ID: HeaderName = HeaderName::from_static("x-nl-user-id");
pub const X_NL_PROTOCOL_VERSION: HeaderName = HeaderName::from_static("x-nl-protocol-version");

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|source| Error::InvalidHeader {
        name: name.clone(),
        source,
    })
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
    )
}

/// True if parsing `path` as part of a URL would resolve segments and thereby change the target.
fn would_normalize(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split(['/', '\\']).any(is_dot_segment)
}

/// Builds requests, optionally authenticated using the credentials of a [`Session`].
///
/// The builder does not send anything; the returned [`Request`] can be executed by any
/// [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct RequestBuilder<S> {
    session: S,
}

impl<S: Session> RequestBuilder<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Build a request for `host` followed by `path`.
    ///
    /// If `authenticated` is set, the session must be logged in and a blank `host` is replaced
    /// with the transport URL of the session. The `path` is appended verbatim and should begin
    /// with a `/`. Paths with `.` or `..` segments are rejected rather than resolved, since the
    /// resolved URL would address a different resource.
    pub fn build_request(
        &self,
        method: Method,
        host: &str,
        path: &str,
        body: Option<Vec<u8>>,
        authenticated: bool,
    ) -> Result<Request, Error> {
        let mut host = Cow::Borrowed(host);
        if authenticated {
            let credentials = self.session.require_login()?;
            if host.is_empty() {
                host = Cow::Owned(credentials.transport_url);
            }
        }

        let url = format!("{host}{path}");
        if would_normalize(path) {
            return Err(Error::InvalidUrl { url, source: None });
        }
        let url = Url::parse(&url).map_err(|source| Error::InvalidUrl {
            url,
            source: Some(source),
        })?;

        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        if let Some(body) = body {
            trace!("Attaching body of {} bytes", body.len());
            *request.body_mut() = Some(body.into());
        }
        if authenticated {
            self.authenticate(&mut request)?;
        }

        debug!("Built {} {}", request.method(), request.url());
        Ok(request)
    }

    /// Build a POST request with `params` as the body.
    ///
    /// Form values are sent as `application/x-www-form-urlencoded`, anything else as JSON.
    /// Without params there is neither a body nor a content type.
    pub fn build_post<T: Serialize>(
        &self,
        host: &str,
        path: &str,
        params: &Params<T>,
        authenticated: bool,
    ) -> Result<Request, Error> {
        let (body, content_type) = match params.encode()? {
            Some((body, content_type)) => (Some(body), Some(content_type)),
            None => (None, None),
        };
        let mut request = self.build_request(Method::POST, host, path, body, authenticated)?;
        if let Some(content_type) = content_type {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Ok(request)
    }

    /// Build a GET request with `params`, if any, as the query string.
    pub fn build_get(
        &self,
        host: &str,
        path: &str,
        params: &FormValues,
        authenticated: bool,
    ) -> Result<Request, Error> {
        let query = params.encode();
        let path = if query.is_empty() {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(format!("{path}?{query}"))
        };
        self.build_request(Method::GET, host, &path, None, authenticated)
    }

    /// Add the headers that identify the current session to `request`.
    ///
    /// On error the request is left untouched.
    pub fn authenticate(&self, request: &mut Request) -> Result<(), Error> {
        let credentials = self.session.require_login()?;

        let user_id = header_value(&X_NL_USER_ID, &credentials.user_id)?;
        // Not HTTP basic authentication; the token is sent as is.
        let mut authorization = header_value(
            &AUTHORIZATION,
            &format!("Basic {}", credentials.access_token.dangerous_reveal()),
        )?;
        authorization.set_sensitive(true);

        let headers = request.headers_mut();
        headers.insert(X_NL_USER_ID, user_id);
        headers.insert(
            X_NL_PROTOCOL_VERSION,
            HeaderValue::from_static(PROTOCOL_VERSION),
        );
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(LANGUAGE));
        Ok(())
    }
}
