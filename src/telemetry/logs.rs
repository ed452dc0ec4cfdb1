//! Reading back written log files.

use super::LOG_EXTENSION;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// Returns the last `count` lines of the file at `path`.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be read.
pub fn tail(path: &Utf8Path, count: usize) -> io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().collect();
    Ok(lines
        .iter()
        .skip(lines.len().saturating_sub(count))
        .map(|line| (*line).to_owned())
        .collect())
}

/// Returns the most recently modified log file in `dir`.
///
/// A missing directory has no logs.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory cannot be listed.
pub fn latest_log(dir: &Utf8Path) -> io::Result<Option<Utf8PathBuf>> {
    let handle = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    let mut latest = None;
    for item in handle.entries()? {
        let entry = item?;
        let name = entry.file_name()?;
        let is_log = Utf8Path::new(&name).extension() == Some(LOG_EXTENSION);
        if !is_log || !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().is_none_or(|(newest, _)| modified > *newest) {
            latest = Some((modified, name));
        }
    }
    Ok(latest.map(|(_, name)| dir.join(name)))
}

#[cfg(test)]
mod tests {
    use super::{latest_log, tail};
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct LogDir {
        _dir: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn log_dir() -> LogDir {
        let dir = TempDir::new().expect("temporary directory");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        LogDir { _dir: dir, path }
    }

    #[rstest]
    #[case(2, &["three", "four"])]
    #[case(10, &["one", "two", "three", "four"])]
    #[case(0, &[])]
    fn tail_keeps_the_last_lines(log_dir: LogDir, #[case] count: usize, #[case] expected: &[&str]) {
        let path = log_dir.path.join("t.log");
        std::fs::write(&path, "one\ntwo\nthree\nfour\n").expect("write log");

        assert_eq!(tail(&path, count).expect("log readable"), expected);
    }

    #[rstest]
    fn latest_log_picks_the_newest_log_file(log_dir: LogDir) {
        let old = log_dir.path.join("old.log");
        let new = log_dir.path.join("new.log");
        std::fs::write(&old, "a").expect("write old log");
        std::fs::write(&new, "b").expect("write new log");
        std::fs::write(log_dir.path.join("notes.txt"), "c").expect("write other file");
        let earlier = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&old)
            .and_then(|file| file.set_modified(earlier))
            .expect("backdate old log");

        assert_eq!(latest_log(&log_dir.path).expect("listable"), Some(new));
    }

    #[rstest]
    fn missing_directory_has_no_logs(log_dir: LogDir) {
        assert_eq!(latest_log(&log_dir.path.join("absent")).expect("no error"), None);
    }
}
