pub mod completions;
pub mod get;
pub mod post;
pub mod save_session;

use std::io::{self, Write};

use anyhow::{bail, Context};
use log::debug;
use nest_api::{RequestBuilder, StaticSession};
use reqwest::Request;

/// Where a request is sent and whether it is authenticated.
#[derive(Clone, Debug, clap::Args)]
pub struct Target {
    /// Base URL of the service.
    ///
    /// Authenticated requests default to the transport URL of the session.
    #[arg(long, default_value = "")]
    host: String,
    /// Path, including the leading `/`, appended verbatim to the host.
    #[arg(long)]
    path: String,
    /// Do not require a session or add any credentials.
    #[arg(long)]
    anonymous: bool,
}

impl Target {
    fn builder(&self) -> anyhow::Result<RequestBuilder<StaticSession>> {
        let session = if self.anonymous {
            StaticSession::logged_out()
        } else {
            StaticSession::from_anywhere().context("Failed to load session")?
        };
        Ok(RequestBuilder::new(session))
    }
}

pub fn parse_pair(s: &str) -> anyhow::Result<(String, String)> {
    let Some((k, v)) = s.split_once('=') else {
        bail!("Expected KEY=VALUE but got {s:?}");
    };
    Ok((k.to_string(), v.to_string()))
}

fn print_request(mut out: impl Write, request: &Request) -> io::Result<()> {
    writeln!(out, "{} {}", request.method(), request.url())?;
    for (name, value) in request.headers() {
        if value.is_sensitive() {
            writeln!(out, "{name}: ***")?;
        } else {
            writeln!(out, "{name}: {}", String::from_utf8_lossy(value.as_bytes()))?;
        }
    }
    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        writeln!(out)?;
        writeln!(out, "{}", String::from_utf8_lossy(body))?;
    }
    Ok(())
}

pub fn print(request: &Request) -> anyhow::Result<()> {
    debug!("Printing {} {}", request.method(), request.url());
    print_request(io::stdout().lock(), request).context("Failed to write to stdout")
}
