/// Events sent from background services to the GUI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The chart definition file changed on disk.
    ChartReload,
}
