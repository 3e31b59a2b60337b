// src/selection.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parent-selection method of an experiment. Results for each method live
/// in their own directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Lexicase,
    Tourney,
    Ifs,
}

impl Selection {
    pub const ALL: [Selection; 3] = [Selection::Lexicase, Selection::Tourney, Selection::Ifs];

    /// Directory name under `<data_root>/<namespace>/` holding clustering output.
    pub fn name(self) -> &'static str {
        match self {
            Selection::Lexicase => "lexicase",
            Selection::Tourney => "tourney",
            Selection::Ifs => "ifs",
        }
    }

    /// Directory name on the render farm; tournament-style runs carry their size.
    pub fn results_dir(self) -> &'static str {
        match self {
            Selection::Lexicase => "lexicase",
            Selection::Tourney => "tourney-7",
            Selection::Ifs => "ifs-7",
        }
    }

    /// Label appended to job titles.
    pub fn title(self) -> &'static str {
        match self {
            Selection::Lexicase => "lexicase",
            Selection::Tourney => "tourney (size 7)",
            Selection::Ifs => "IFS (size 7)",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_differ_for_tournament_methods() {
        assert_eq!(Selection::Lexicase.results_dir(), Selection::Lexicase.name());
        assert_eq!(Selection::Tourney.results_dir(), "tourney-7");
        assert_eq!(Selection::Ifs.results_dir(), "ifs-7");
        assert_eq!(Selection::Ifs.title(), "IFS (size 7)");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let sels: Vec<Selection> = serde_yaml::from_str("[lexicase, tourney, ifs]").unwrap();
        assert_eq!(sels, Selection::ALL.to_vec());
    }
}
