//! External solver reached through a subprocess.

use super::dimacs::write_instance;
use super::response::parse_response;
use super::types::{Oracle, OracleOutcome};
use crate::encoding::{ClauseSet, Weighting};
use crate::error::OracleError;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between child status polls while waiting for the solver.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for [`ProcessOracle`].
///
/// # Examples
///
/// ```
/// use u_mrsort::oracle::OracleConfig;
///
/// let config = OracleConfig::new("gophersat")
///     .with_time_limit_ms(30_000)
///     .with_args(vec!["-verbose".to_string()]);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.time_limit_ms, Some(30_000));
/// ```
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Solver executable (path or name looked up on `PATH`).
    pub program: PathBuf,
    /// Arguments placed before the instance path.
    pub args: Vec<String>,
    /// Wall-clock budget for one solve. `None` waits indefinitely.
    pub time_limit_ms: Option<u64>,
    /// Directory for exchange files. `None` uses the system temp directory.
    pub work_dir: Option<PathBuf>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gophersat"),
            args: Vec::new(),
            time_limit_ms: Some(60_000),
            work_dir: None,
        }
    }
}

impl OracleConfig {
    /// Default configuration for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Disables the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.program.as_os_str().is_empty() {
            return Err("program must not be empty".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive".into());
        }
        Ok(())
    }
}

/// Runs an external SAT/MaxSAT solver on a temporary exchange file.
///
/// Each call writes its own uniquely named instance file, so one oracle can
/// serve concurrent training calls. The solver receives the instance path as
/// its last argument and must answer on standard output (see
/// [`parse_response`]). On timeout the process is killed and whatever it
/// printed is discarded.
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    config: OracleConfig,
}

impl ProcessOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn write_exchange_file(
        &self,
        clauses: &ClauseSet,
        weighting: Weighting,
    ) -> Result<tempfile::NamedTempFile, OracleError> {
        let suffix = if weighting.is_weighted() { ".wcnf" } else { ".cnf" };
        let mut builder = tempfile::Builder::new();
        builder.prefix("u-mrsort-").suffix(suffix);
        let file = match &self.config.work_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let mut writer = BufWriter::new(file.as_file());
        write_instance(&mut writer, clauses, weighting)?;
        writer.flush()?;
        drop(writer);
        Ok(file)
    }
}

impl Oracle for ProcessOracle {
    fn solve(&self, clauses: &ClauseSet, weighting: Weighting) -> Result<OracleOutcome, OracleError> {
        let exchange = self.write_exchange_file(clauses, weighting)?;
        let program = self.config.program.display().to_string();

        tracing::debug!(
            program = %program,
            path = %exchange.path().display(),
            variables = clauses.variable_count,
            clauses = clauses.len(),
            "launching oracle"
        );

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(exchange.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Unavailable {
                program: program.clone(),
                source,
            })?;

        // A solver blocked on a full pipe never exits: drain both now.
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let deadline = self
            .config
            .time_limit_ms
            .map(|ms| (Instant::now() + Duration::from_millis(ms), ms));

        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None => {
                    if let Some((deadline, limit_ms)) = deadline {
                        if Instant::now() >= deadline {
                            // Readers are left detached: a grandchild may
                            // still hold the pipes open.
                            let _ = child.kill();
                            let _ = child.wait();
                            tracing::warn!(program = %program, limit_ms, "oracle timed out, killed");
                            return Err(OracleError::Timeout { limit_ms });
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        };

        // A background helper may still hold the pipes after the child exits.
        let deadline_at = deadline.map(|(at, _)| at);
        let (Some(output), Some(errors)) = (
            collect_reader(stdout, deadline_at),
            collect_reader(stderr, deadline_at),
        ) else {
            let limit_ms = deadline.map_or(0, |(_, ms)| ms);
            tracing::warn!(program = %program, limit_ms, "oracle output still open at time limit");
            return Err(OracleError::Timeout { limit_ms });
        };
        tracing::debug!(
            program = %program,
            code = ?status.code(),
            stdout_bytes = output.len(),
            "oracle exited"
        );

        parse_response(&output).map_err(|err| {
            let stderr = errors.trim();
            if stderr.is_empty() {
                err
            } else {
                OracleError::protocol(format!("{err}; stderr: {stderr}"))
            }
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });
        rx
    })
}

/// Everything a reader captured, or `None` if its pipe is still open at
/// `deadline`.
fn collect_reader(reader: Option<Receiver<String>>, deadline: Option<Instant>) -> Option<String> {
    let Some(rx) = reader else {
        return Some(String::new());
    };
    match deadline {
        None => Some(rx.recv().unwrap_or_default()),
        Some(at) => match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
            Ok(text) => Some(text),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        },
    }
}
