use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

/// Where a command writes its report: stdout, or a file given by `--output`.
pub(crate) struct ReportOutput {
    target: String,
    writer: Box<dyn Write>,
}

impl ReportOutput {
    pub(crate) fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                target: "stdout".to_owned(),
                writer: Box::new(io::stdout().lock()),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            target: path.display().to_string(),
            writer: Box::new(BufWriter::new(file)),
        })
    }

    pub(crate) fn target(&self) -> &str {
        &self.target
    }

    /// Writes one `what` report through `write`, then flushes.
    pub(crate) fn emit<F>(&mut self, what: &str, write: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        write(&mut *self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write {what} to {}", self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_writes_file() {
        let path = std::env::temp_dir().join(format!("playcall-output-{}.txt", std::process::id()));
        let mut output = ReportOutput::create(Some(&path)).unwrap();
        assert_eq!(output.target(), path.display().to_string());
        output.emit("report", |w| w.write_all(b"Split: down_number\n")).unwrap();
        drop(output);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Split: down_number\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let path = std::env::temp_dir().join("playcall-no-such-dir").join("report.txt");
        let err = ReportOutput::create(Some(&path)).err().unwrap();
        assert!(err.to_string().contains("Failed to create output file"));
    }
}
