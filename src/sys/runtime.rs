use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the chart-definition watcher on a dedicated thread. The GUI thread
/// only ever receives events over the channel.
pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("failed to create tokio runtime: {e}");
                return;
            }
        };

        rt.block_on(async {
            crate::config::run_async_watcher(tx).await;
        });
    });
}
