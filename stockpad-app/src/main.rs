mod ui;

use std::io;
use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockpad_store::{Config, RedbKv, Store};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!(path = %config.storage.path, "opening stockpad storage");
    let kv = RedbKv::open(Path::new(&config.storage.path))?;
    let (store, warnings) = Store::open(Box::new(kv));
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let stdin = io::stdin();
    let mut app = ui::App::new(store);
    app.run(&mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}
