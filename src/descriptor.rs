use std::fmt;

/// The trainer entry points a launch knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trainer {
    /// Baseline 1D graph-convolution trainer.
    Baseline,
    /// 1.5D trainer that replicates the feature matrix across process groups.
    Replicated,
}

impl Trainer {
    /// Script executed for this trainer.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Baseline => "gcn_distr.py",
            Self::Replicated => "gcn_distr_15d.py",
        }
    }
}

impl fmt::Display for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Replicated => write!(f, "replicated"),
        }
    }
}

/// One fully-formed trainer invocation, ready to be handed to a process runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationDescriptor {
    pub trainer: Trainer,
    pub args: Vec<String>,
    /// Rendezvous variables read by `torch.distributed`, sorted by name.
    pub env: Vec<(String, String)>,
}

impl InvocationDescriptor {
    pub fn program(&self) -> &'static str {
        self.trainer.program()
    }

    /// Returns the value of `--name=value` if the flag is present.
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        let prefix = format!("--{name}=");
        self.args.iter().find_map(|arg| arg.strip_prefix(&prefix))
    }

    /// Renders the invocation as a single POSIX shell line, for dry runs and logs.
    ///
    /// Words the shell would split or expand are single-quoted.
    pub fn command_line(&self, interpreter: &str) -> String {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{k}={}", shell_quote(v)))
            .collect();
        parts.push(shell_quote(interpreter));
        parts.push(self.program().to_string());
        parts.extend(self.args.iter().map(|arg| shell_quote(arg)));
        parts.join(" ")
    }
}

fn shell_quote(word: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "-_=./:,@%+".contains(c);
    if !word.is_empty() && word.chars().all(plain) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// A boolean the trainers parse from its Python spelling.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PyBool(pub bool);

impl fmt::Display for PyBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "True" } else { "False" })
    }
}

pub(crate) fn flag(name: &str, value: impl fmt::Display) -> String {
    format!("--{name}={value}")
}
