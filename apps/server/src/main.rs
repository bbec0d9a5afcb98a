use anyhow::Context;
use campus::domain::config::ApiConfig;
use campus::kernel::config::load_config;
use campus_logger::{Logger, parse_level};
use campus_server::Server;
use std::path::PathBuf;

#[campus_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(None::<PathBuf>).context("Critical: Configuration is malformed")?;

    let logging = &cfg.logging;
    let builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&logging.level)?);
    let _log = match &logging.dir {
        Some(dir) => builder.path(dir).json(logging.json).init()?,
        None => builder.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
