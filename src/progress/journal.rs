const LOG_MAX_ENTRIES: usize = 32;

/// Human-readable "progress updated" notices for the UI to drain.
#[derive(Default)]
pub struct ProgressLog {
    pub entries: Vec<String>,
}

impl ProgressLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        let entry = entry.into();
        log::info!("{entry}");
        self.entries.push(entry);
        if self.entries.len() > LOG_MAX_ENTRIES {
            let overflow = self.entries.len() - LOG_MAX_ENTRIES;
            self.entries.drain(..overflow);
        }
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.entries)
    }
}
