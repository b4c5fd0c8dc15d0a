use std::{fmt, io};

/// The launcher's result type.
pub type Result<T> = std::result::Result<T, LaunchError>;

/// All errors that can occur while planning or running a launch.
#[derive(Debug)]
pub enum LaunchError {
    /// Invalid job coordinates or training parameters, caught before anything is spawned.
    InvalidConfig(String),
    /// A trainer process could not be started.
    Spawn { program: String, source: io::Error },
    /// A trainer process finished with a non-zero status. `code` is `None` when
    /// the process was terminated by a signal, in which case `signal` holds it
    /// where the platform reports one.
    Exited {
        program: String,
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// The launch was interrupted before every trainer finished.
    Interrupted,
    /// A training parameters file could not be parsed.
    Parse(serde_json::Error),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl LaunchError {
    /// The exit code a binary should report for this error.
    ///
    /// Signal deaths map to `128 + signal`, as shells report them.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited {
                code: Some(code), ..
            } => *code,
            Self::Exited {
                signal: Some(signal),
                ..
            } => 128 + signal,
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Spawn { program, source } => {
                write!(f, "failed to start {program}: {source}")
            }
            Self::Exited {
                program,
                code: Some(code),
                ..
            } => write!(f, "{program} exited with status {code}"),
            Self::Exited {
                program,
                signal: Some(signal),
                ..
            } => write!(f, "{program} was terminated by signal {signal}"),
            Self::Exited { program, .. } => write!(f, "{program} was terminated by a signal"),
            Self::Interrupted => write!(f, "launch interrupted"),
            Self::Parse(e) => write!(f, "invalid training parameters: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LaunchError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exited(code: Option<i32>, signal: Option<i32>) -> LaunchError {
        LaunchError::Exited {
            program: "gcn_distr.py".into(),
            code,
            signal,
        }
    }

    #[test]
    fn test_exit_code_propagates_child_status() {
        assert_eq!(exited(Some(7), None).exit_code(), 7);
    }

    #[test]
    fn test_exit_code_signal_death() {
        let err = exited(None, Some(9));
        assert_eq!(err.exit_code(), 137);
        assert_eq!(err.to_string(), "gcn_distr.py was terminated by signal 9");
    }

    #[test]
    fn test_exit_code_unknown_signal() {
        let err = exited(None, None);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "gcn_distr.py was terminated by a signal");
    }

    #[test]
    fn test_exit_code_interrupted() {
        assert_eq!(LaunchError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_exit_code_config_errors() {
        assert_eq!(LaunchError::InvalidConfig("rank".into()).exit_code(), 1);

        let parse: LaunchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(parse, LaunchError::Parse(_)));
        assert_eq!(parse.exit_code(), 1);
    }
}
