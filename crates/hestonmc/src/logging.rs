use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the log directory
pub const LOG_FILE: &str = "hestonmc.log";
/// Trim the log once it grows past this size (2 MB)
const MAX_LOG_SIZE: u64 = 2 * 1024 * 1024;
/// Bytes of the most recent entries kept after trimming
const KEEP_SIZE: u64 = 256 * 1024;

/// Drop the oldest entries when the log has grown past `max_size`,
/// keeping the last `keep` bytes from the first full line onwards.
/// Returns whether the file was trimmed.
fn trim_log(log_path: &Path, max_size: u64, keep: u64) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= max_size {
        return Ok(false);
    }

    let mut tail = Vec::new();
    {
        let mut file = File::open(log_path)?;
        file.seek(SeekFrom::Start(size.saturating_sub(keep)))?;
        file.read_to_end(&mut tail)?;
    }

    let start = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- earlier runs trimmed ---\n")?;
    file.write_all(&tail[start..])?;
    Ok(true)
}

/// Hands out writers that share one open log file
#[derive(Clone)]
struct SharedFile(Arc<Mutex<File>>);

struct SharedFileWriter(Arc<Mutex<File>>);

impl Write for SharedFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = SharedFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileWriter(Arc::clone(&self.0))
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hestonmc={level},hestonmc_core=warn")))
}

/// Initialize logging.
///
/// Without a directory, events go to stderr so they never interleave with the
/// report on stdout. With a directory, events are appended to
/// `{log_dir}/hestonmc.log`, which is trimmed to its most recent entries once
/// it passes 2 MB. `RUST_LOG` overrides `level` when set.
pub fn init_logging(log_dir: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let filter = env_filter(level);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
        return Ok(());
    };

    fs::create_dir_all(dir)?;
    let log_path = dir.join(LOG_FILE);

    if let Err(e) = trim_log(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: could not trim {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(SharedFile(Arc::new(Mutex::new(file))))
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "one\ntwo\n").unwrap();

        assert!(!trim_log(&path, 1024, 4).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!trim_log(&dir.path().join(LOG_FILE), 10, 5).unwrap());
    }

    #[test]
    fn test_large_log_keeps_whole_recent_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let lines: String = (0..100).map(|i| format!("line {i:03}\n")).collect();
        fs::write(&path, &lines).unwrap();

        // 9 bytes per line; keeping 30 bytes cuts into line 096
        assert!(trim_log(&path, 100, 30).unwrap());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "--- earlier runs trimmed ---\nline 097\nline 098\nline 099\n"
        );
    }

    #[test]
    fn test_shared_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        let shared = SharedFile(Arc::new(Mutex::new(file)));

        shared.make_writer().write_all(b"first\n").unwrap();
        let mut second = shared.make_writer();
        second.write_all(b"second\n").unwrap();
        second.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
