use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::{DirectorySink, History};

/// Row format of a persisted history.
///
/// | format                 | header                  | row                                   |
/// |------------------------|-------------------------|---------------------------------------|
/// | `snapshot-text`        | none                    | `A=<a> B=<b>`                         |
/// | `snapshot-csv`         | `Generation,A,B`        | `<gen>,<a>,<b>`                       |
/// | `event-csv-with-counts`| `Generation,Event,A,B`  | `<gen>,<bi><bt>:<di><dt>,<a>,<b>`     |
/// | `event-csv-bare`       | none                    | `<bi><bt>:<di><dt>`                   |
///
/// Snapshot formats include generation 0; event formats have one row per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryFormat {
    SnapshotText,
    SnapshotCsv,
    #[default]
    EventCsvWithCounts,
    EventCsvBare,
}

impl HistoryFormat {
    pub fn header(&self) -> Option<&'static str> {
        match self {
            Self::SnapshotText | Self::EventCsvBare => None,
            Self::SnapshotCsv => Some("Generation,A,B"),
            Self::EventCsvWithCounts => Some("Generation,Event,A,B"),
        }
    }

    /// Number of rows `history` produces, excluding any header.
    pub fn row_count(&self, history: &History) -> usize {
        match self {
            Self::SnapshotText | Self::SnapshotCsv => history.len() + 1,
            Self::EventCsvWithCounts | Self::EventCsvBare => history.len(),
        }
    }

    /// Write the header (if any) and every row of `history`.
    pub fn write_history<W: Write>(&self, history: &History, out: &mut W) -> io::Result<()> {
        if let Some(header) = self.header() {
            writeln!(out, "{header}")?;
        }
        match self {
            Self::SnapshotText => {
                for (_, c) in history.snapshots() {
                    writeln!(out, "A={} B={}", c.a, c.b)?;
                }
            }
            Self::SnapshotCsv => {
                for (generation, c) in history.snapshots() {
                    writeln!(out, "{generation},{},{}", c.a, c.b)?;
                }
            }
            Self::EventCsvWithCounts => {
                for step in history.steps() {
                    writeln!(
                        out,
                        "{},{},{},{}",
                        step.generation, step.outcome, step.counts.a, step.counts.b
                    )?;
                }
            }
            Self::EventCsvBare => {
                for event in history.events() {
                    writeln!(out, "{event}")?;
                }
            }
        }
        Ok(())
    }

    /// Render into a `String`.
    pub fn render(&self, history: &History) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_history(history, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl fmt::Display for HistoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnapshotText => write!(f, "snapshot-text"),
            Self::SnapshotCsv => write!(f, "snapshot-csv"),
            Self::EventCsvWithCounts => write!(f, "event-csv-with-counts"),
            Self::EventCsvBare => write!(f, "event-csv-bare"),
        }
    }
}

impl std::str::FromStr for HistoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snapshot-text" => Ok(Self::SnapshotText),
            "snapshot-csv" => Ok(Self::SnapshotCsv),
            "event-csv-with-counts" | "event-csv" => Ok(Self::EventCsvWithCounts),
            "event-csv-bare" => Ok(Self::EventCsvBare),
            _ => Err(format!(
                "Unknown history format: {s}. Available: snapshot-text, snapshot-csv, event-csv-with-counts, event-csv-bare"
            )),
        }
    }
}

/// What to do when an artifact with the destination name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Append `_<i>` with the smallest unused `i >= 1`.
    #[default]
    AutoIncrement,
    /// Replace the existing artifact.
    Overwrite,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoIncrement => write!(f, "auto-increment"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto-increment" | "increment" => Ok(Self::AutoIncrement),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(format!(
                "Unknown collision policy: {s}. Available: auto-increment, overwrite"
            )),
        }
    }
}

/// Where and how run histories are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Output directory; `None` disables history persistence
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: HistoryFormat,
    #[serde(default)]
    pub collision: CollisionPolicy,
}

impl RecordingConfig {
    pub fn disabled() -> Self {
        Self {
            output_dir: None,
            format: HistoryFormat::default(),
            collision: CollisionPolicy::default(),
        }
    }

    pub fn in_dir(
        dir: impl Into<PathBuf>,
        format: HistoryFormat,
        collision: CollisionPolicy,
    ) -> Self {
        Self {
            output_dir: Some(dir.into()),
            format,
            collision,
        }
    }

    /// Sink writing into the configured directory, if persistence is enabled.
    pub fn sink(&self) -> Option<DirectorySink> {
        self.output_dir
            .as_ref()
            .map(|dir| DirectorySink::new(dir, self.format, self.collision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::IndividualType;
    use crate::evolution::TransitionOutcome;
    use crate::simulation::Population;
    use crate::storage::EventRecorder;

    /// Two-step history on N = 4 starting from 2 mutants.
    fn sample_history() -> History {
        let mut pop = Population::new(4, 2).unwrap();
        let mut recorder = EventRecorder::new(&pop);
        for outcome in [
            TransitionOutcome {
                birth_index: 0,
                birth_type: IndividualType::A,
                death_index: 3,
                death_type: IndividualType::B,
            },
            TransitionOutcome {
                birth_index: 1,
                birth_type: IndividualType::A,
                death_index: 2,
                death_type: IndividualType::B,
            },
        ] {
            outcome.apply(&mut pop);
            recorder.record(outcome, &pop);
        }
        recorder.finish()
    }

    #[test]
    fn test_snapshot_text() {
        let text = HistoryFormat::SnapshotText.render(&sample_history()).unwrap();
        assert_eq!(text, "A=2 B=2\nA=3 B=1\nA=4 B=0\n");
    }

    #[test]
    fn test_snapshot_csv() {
        let text = HistoryFormat::SnapshotCsv.render(&sample_history()).unwrap();
        assert_eq!(text, "Generation,A,B\n0,2,2\n1,3,1\n2,4,0\n");
    }

    #[test]
    fn test_event_csv_with_counts() {
        let text = HistoryFormat::EventCsvWithCounts.render(&sample_history()).unwrap();
        assert_eq!(text, "Generation,Event,A,B\n1,0A:3B,3,1\n2,1A:2B,4,0\n");
    }

    #[test]
    fn test_event_csv_bare() {
        let text = HistoryFormat::EventCsvBare.render(&sample_history()).unwrap();
        assert_eq!(text, "0A:3B\n1A:2B\n");
    }

    #[test]
    fn test_row_count() {
        let history = sample_history();
        assert_eq!(HistoryFormat::SnapshotCsv.row_count(&history), 3);
        assert_eq!(HistoryFormat::EventCsvBare.row_count(&history), 2);
    }

    #[test]
    fn test_format_from_str_and_display() {
        for format in [
            HistoryFormat::SnapshotText,
            HistoryFormat::SnapshotCsv,
            HistoryFormat::EventCsvWithCounts,
            HistoryFormat::EventCsvBare,
        ] {
            assert_eq!(format.to_string().parse::<HistoryFormat>(), Ok(format));
        }
        assert!("parquet".parse::<HistoryFormat>().is_err());
    }

    #[test]
    fn test_recording_config_serde_defaults() {
        let config: RecordingConfig =
            serde_json::from_str(r#"{"output_dir":"out"}"#).unwrap();
        assert_eq!(config.format, HistoryFormat::EventCsvWithCounts);
        assert_eq!(config.collision, CollisionPolicy::AutoIncrement);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
    }
}
