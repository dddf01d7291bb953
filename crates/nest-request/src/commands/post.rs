use anyhow::Context;
use nest_api::{FormValues, Params};
use serde_json::Value;

use super::{parse_pair, print, Target};

#[derive(Clone, Debug, clap::Parser)]
pub struct PostCommand {
    #[command(flatten)]
    target: Target,
    /// Form field, may be repeated.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair, conflicts_with = "json")]
    form: Vec<(String, String)>,
    /// JSON document to send as the body.
    #[arg(long)]
    json: Option<String>,
}

impl PostCommand {
    pub fn exec(self) -> anyhow::Result<()> {
        let Self { target, form, json } = self;
        let params = match json {
            Some(json) => {
                Params::Json(serde_json::from_str::<Value>(&json).context("Invalid JSON")?)
            }
            None if form.is_empty() => Params::None,
            None => Params::Form(form.into_iter().collect::<FormValues>()),
        };
        let request = target
            .builder()?
            .build_post(&target.host, &target.path, &params, !target.anonymous)
            .context("Failed to build POST request")?;
        print(&request)
    }
}
