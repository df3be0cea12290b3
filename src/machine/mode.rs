use std::fmt;

use serde::{Deserialize, Serialize};

/// Decision regime shared by every bean in a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unbiased left/right draw at every peg.
    #[default]
    Luck,
    /// Fixed right-move budget derived once per bean.
    Skill,
}

impl Mode {
    /// Get the command-line token for this mode
    pub fn name(self) -> &'static str {
        match self {
            Mode::Luck => "luck",
            Mode::Skill => "skill",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
