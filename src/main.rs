use std::process;

use log::info;

use capgains::app::App;
use capgains::config::Config;
use capgains::engine::Engine;
use capgains::error::Error;
use capgains::loader;
use capgains::reports::{CapitalGainsReport, OpenLotsReport};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let app = App::new();
    if let Err(err) = run(&app) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(app: &App) -> Result<(), Error> {
    let config = Config::load_or_default(app.get_config_path())?;
    let taxonomy = config.taxonomy();

    let loaded = loader::load_trades(app.get_input_path())?;
    info!(
        "loaded {} trades from {} ({} rejected)",
        loaded.trades.len(),
        app.get_input_path(),
        loaded.rejected.len()
    );

    let mut engine = Engine::new(&taxonomy);
    let annotated = engine.process_all(loaded.trades);

    let report = CapitalGainsReport::new(annotated);
    info!("total realized gain/loss: {}", report.total_gain_loss());
    if !engine.warnings().is_empty() {
        info!(
            "{} disposal(s) had no acquisition history; figures were taxed at a zero cost basis",
            engine.warnings().len()
        );
    }

    report.write_to_file(app.get_output_path())?;
    OpenLotsReport::new(engine.ledger()).write_to_file(app.get_lots_path())?;
    info!(
        "wrote {} and {}",
        app.get_output_path(),
        app.get_lots_path()
    );

    Ok(())
}
