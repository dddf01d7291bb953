use anyhow::Context;
use nest_api::FormValues;

use super::{parse_pair, print, Target};

#[derive(Clone, Debug, clap::Parser)]
pub struct GetCommand {
    #[command(flatten)]
    target: Target,
    /// Query parameter, may be repeated.
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
    query: Vec<(String, String)>,
}

impl GetCommand {
    pub fn exec(self) -> anyhow::Result<()> {
        let Self { target, query } = self;
        let query: FormValues = query.into_iter().collect();
        let request = target
            .builder()?
            .build_get(&target.host, &target.path, &query, !target.anonymous)
            .context("Failed to build GET request")?;
        print(&request)
    }
}
