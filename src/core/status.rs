use colored::{ColoredString, Colorize};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Lifecycle state of a test run, as numbered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Created,
    Queued,
    Initializing,
    Running,
    Finished,
    TimedOut,
    AbortingUser,
    AbortedUser,
    AbortingSystem,
    AbortedSystem,
    AbortedScriptError,
    AbortingThreshold,
    AbortedThreshold,
    FailedThreshold,
    /// Code not known to this client version
    Unknown(i32),
}

impl RunStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => RunStatus::Created,
            0 => RunStatus::Queued,
            1 => RunStatus::Initializing,
            2 => RunStatus::Running,
            3 => RunStatus::Finished,
            4 => RunStatus::TimedOut,
            5 => RunStatus::AbortingUser,
            6 => RunStatus::AbortedUser,
            7 => RunStatus::AbortingSystem,
            8 => RunStatus::AbortedSystem,
            9 => RunStatus::AbortedScriptError,
            10 => RunStatus::AbortingThreshold,
            11 => RunStatus::AbortedThreshold,
            12 => RunStatus::FailedThreshold,
            other => RunStatus::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            RunStatus::Created => -1,
            RunStatus::Queued => 0,
            RunStatus::Initializing => 1,
            RunStatus::Running => 2,
            RunStatus::Finished => 3,
            RunStatus::TimedOut => 4,
            RunStatus::AbortingUser => 5,
            RunStatus::AbortedUser => 6,
            RunStatus::AbortingSystem => 7,
            RunStatus::AbortedSystem => 8,
            RunStatus::AbortedScriptError => 9,
            RunStatus::AbortingThreshold => 10,
            RunStatus::AbortedThreshold => 11,
            RunStatus::FailedThreshold => 12,
            RunStatus::Unknown(code) => code,
        }
    }

    /// No further transitions will happen
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Finished
                | RunStatus::TimedOut
                | RunStatus::AbortedUser
                | RunStatus::AbortedSystem
                | RunStatus::AbortedScriptError
                | RunStatus::AbortedThreshold
                | RunStatus::FailedThreshold
        )
    }

    /// Terminal states reported to the shell as a non-zero exit code
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            RunStatus::AbortedSystem
                | RunStatus::AbortedScriptError
                | RunStatus::AbortedThreshold
                | RunStatus::FailedThreshold
        )
    }

    /// Process exit code for a run that ended in this state
    pub fn exit_code(self) -> i32 {
        if self.is_failure() {
            self.code()
        } else {
            0
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            RunStatus::Created => "Created",
            RunStatus::Queued => "Queued",
            RunStatus::Initializing => "Initializing",
            RunStatus::Running => "Running",
            RunStatus::Finished => "Finished",
            RunStatus::TimedOut => "Timed out",
            RunStatus::AbortingUser => "Aborting (by user)",
            RunStatus::AbortedUser => "Aborted (by user)",
            RunStatus::AbortingSystem => "Aborting (by system)",
            RunStatus::AbortedSystem => "Aborted (by system)",
            RunStatus::AbortedScriptError => "Aborted (script error)",
            RunStatus::AbortingThreshold => "Aborting (by threshold)",
            RunStatus::AbortedThreshold => "Aborted (by threshold)",
            RunStatus::FailedThreshold => "Failed (threshold)",
            RunStatus::Unknown(_) => "Unknown",
        }
    }

    /// Status text colored by outcome: pending yellow, finished green, failed red
    pub fn styled(self) -> ColoredString {
        match self {
            RunStatus::Created | RunStatus::Queued | RunStatus::Initializing | RunStatus::Running => {
                self.text().yellow()
            }
            RunStatus::Finished => self.text().green(),
            RunStatus::Unknown(_) => self.text().normal(),
            _ => self.text().red(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(RunStatus::from_code)
    }
}
