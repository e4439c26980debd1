use super::TickSnapshot;
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::path::Path;

pub struct MatchLogger {
    writer: Writer<File>,
}

impl MatchLogger {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log(&mut self, snapshot: &TickSnapshot) -> Result<()> {
        self.writer.serialize(snapshot)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn log_batch(&mut self, snapshots: &[TickSnapshot]) -> Result<()> {
        for snapshot in snapshots {
            self.writer.serialize(snapshot)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
