//! External document conversion.
//!
//! Runs the configured converter (`pandoc` by default) as
//! `<converter> <input> -o <output>` with the invocation root as working
//! directory. The child is polled until it exits or the timeout passes, in
//! which case it is killed.
//!
//! Nothing here returns an error: every way a conversion can go wrong is a
//! [`ConversionOutcome`] variant, which the CLI prints as a pass/fail line.

use crate::config::PdfConfig;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Succeeded { output: PathBuf, size_bytes: u64 },
    Failed { status: Option<i32>, stderr: String },
    TimedOut { after: Duration },
    LaunchFailed { reason: String },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Converter {
    pub program: String,
    pub timeout: Duration,
}

impl Converter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(&config.converter, Duration::from_secs(config.timeout_secs))
    }

    /// Convert `input` to `output`, both relative to `root`.
    pub fn convert(&self, root: &Path, input: &Path, output: &Path) -> ConversionOutcome {
        debug!(
            program = %self.program,
            input = %input.display(),
            output = %output.display(),
            "launching converter"
        );

        let mut child = match Command::new(&self.program)
            .arg(input)
            .arg("-o")
            .arg(output)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %self.program, error = %e, "converter could not be started");
                return ConversionOutcome::LaunchFailed {
                    reason: format!("{}: {e}", self.program),
                };
            }
        };

        // Drain stderr on the side so a chatty converter cannot block on a full pipe
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });
        let collect_stderr = || {
            stderr_reader
                .and_then(|h| h.join().ok())
                .unwrap_or_default()
        };

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(timeout = ?self.timeout, "converter timed out and was killed");
                    return ConversionOutcome::TimedOut {
                        after: self.timeout,
                    };
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return ConversionOutcome::LaunchFailed {
                        reason: format!("waiting on {}: {e}", self.program),
                    };
                }
            }
        };

        finish(status, root.join(output), collect_stderr())
    }
}

fn finish(status: ExitStatus, output: PathBuf, stderr: String) -> ConversionOutcome {
    if !status.success() {
        warn!(status = ?status.code(), "converter failed");
        return ConversionOutcome::Failed {
            status: status.code(),
            stderr: stderr.trim().to_string(),
        };
    }
    match fs::metadata(&output) {
        Ok(meta) => {
            info!(output = %output.display(), size_bytes = meta.len(), "document converted");
            ConversionOutcome::Succeeded {
                output,
                size_bytes: meta.len(),
            }
        }
        Err(e) => ConversionOutcome::Failed {
            status: status.code(),
            stderr: format!("converter exited cleanly but {} is missing: {e}", output.display()),
        },
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // With `sh` as the converter the input document is itself the script:
    // `sh input.md -o out.pdf` runs it with $1 = "-o" and $2 = "out.pdf".
    fn script(tmp: &TempDir, body: &str) -> PathBuf {
        let path = PathBuf::from("input.sh");
        fs::write(tmp.path().join(&path), body).unwrap();
        path
    }

    #[test]
    fn successful_conversion_reports_size() {
        let tmp = TempDir::new().unwrap();
        let input = script(&tmp, "printf 'pdf-bytes' > \"$2\"\n");
        let converter = Converter::new("sh", Duration::from_secs(10));

        let outcome = converter.convert(tmp.path(), &input, Path::new("out.pdf"));
        assert_eq!(
            outcome,
            ConversionOutcome::Succeeded {
                output: tmp.path().join("out.pdf"),
                size_bytes: 9,
            }
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn nonzero_exit_captures_stderr() {
        let tmp = TempDir::new().unwrap();
        let input = script(&tmp, "echo 'unknown format' >&2\nexit 3\n");
        let converter = Converter::new("sh", Duration::from_secs(10));

        let outcome = converter.convert(tmp.path(), &input, Path::new("out.pdf"));
        assert_eq!(
            outcome,
            ConversionOutcome::Failed {
                status: Some(3),
                stderr: "unknown format".to_string(),
            }
        );
    }

    #[test]
    fn clean_exit_without_output_is_failure() {
        let tmp = TempDir::new().unwrap();
        let input = script(&tmp, "exit 0\n");
        let converter = Converter::new("sh", Duration::from_secs(10));

        let outcome = converter.convert(tmp.path(), &input, Path::new("out.pdf"));
        assert!(matches!(outcome, ConversionOutcome::Failed { status: Some(0), .. }));
    }

    #[test]
    fn slow_converter_is_killed() {
        let tmp = TempDir::new().unwrap();
        let input = script(&tmp, "sleep 5\n");
        let converter = Converter::new("sh", Duration::from_millis(200));

        let started = Instant::now();
        let outcome = converter.convert(tmp.path(), &input, Path::new("out.pdf"));
        assert_eq!(
            outcome,
            ConversionOutcome::TimedOut {
                after: Duration::from_millis(200)
            }
        );
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_launch_failure() {
        let tmp = TempDir::new().unwrap();
        let converter = Converter::new("definitely-not-a-converter-xyz", Duration::from_secs(1));
        let outcome = converter.convert(tmp.path(), Path::new("a.md"), Path::new("a.pdf"));
        assert!(matches!(outcome, ConversionOutcome::LaunchFailed { .. }));
    }

    #[test]
    fn from_config_uses_seconds() {
        let converter = Converter::from_config(&PdfConfig::default());
        assert_eq!(converter.program, "pandoc");
        assert_eq!(converter.timeout, Duration::from_secs(60));
    }
}
