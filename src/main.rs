use clap::Parser;
use motivrad::config;
use motivrad::gui::app::{AppInit, AppModel};
use motivrad::gui::chart::ChartState;
use motivrad::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive radial motive-profile chart editor")]
struct Args {
    /// Chart definition file (defaults to the user config directory)
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Session file (defaults to the user data directory)
    #[arg(long)]
    session: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if args.chart.is_none()
        && let Err(e) = config::write_default_config()
    {
        log::warn!("could not seed default chart definition: {e}");
    }

    let chart = config::load_or_default(args.chart.as_deref());
    let state = ChartState::new(&chart);

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.motivrad.editor");
    app.run::<AppModel>(AppInit {
        state,
        chart_path: args.chart,
        session_path: args.session,
        rx,
    });
}
