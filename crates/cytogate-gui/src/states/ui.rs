use cytogate_core::io::ExportFormat;

/// Maximum number of log lines kept in the status panel.
const LOG_CAPACITY: usize = 500;

/// Overall UI state. View and selection state lives in the session.
#[derive(Default)]
pub struct UIState {
    /// Label of the load or export currently running (None = idle).
    pub running: Option<&'static str>,

    /// Format used by the export dialog.
    pub export_format: ExportFormat,

    /// Log messages.
    pub log_messages: Vec<String>,

    pub show_about: bool,
}

impl UIState {
    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > LOG_CAPACITY {
            let excess = self.log_messages.len() - LOG_CAPACITY;
            self.log_messages.drain(..excess);
        }
    }
}
