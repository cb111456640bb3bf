//! The single event shape sent to the stats service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SubjectConfig;
use crate::exercise::{ExerciseKind, Outcome};

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTag {
    Win,
    Lose,
    Completed,
    Exit,
}

impl ResultTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultTag::Win => "win",
            ResultTag::Lose => "lose",
            ResultTag::Completed => "completed",
            ResultTag::Exit => "exit",
        }
    }
}

impl fmt::Display for ResultTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /add_stat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub username: String,
    pub age: u32,
    pub game_name: String,
    pub score: u32,
    pub time_seconds: u64,
    pub result: ResultTag,
}

impl StatRecord {
    pub fn new(subject: &SubjectConfig, kind: ExerciseKind, outcome: Outcome) -> Self {
        Self {
            username: subject.username.clone(),
            age: subject.age,
            game_name: kind.game_name().to_string(),
            score: outcome.score,
            time_seconds: outcome.time_seconds,
            result: outcome.result,
        }
    }
}

impl fmt::Display for StatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} score={} time={}s user={}",
            self.game_name, self.result, self.score, self.time_seconds, self.username
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_wire_shape() {
        let subject = SubjectConfig {
            username: "maria".into(),
            age: 67,
        };
        let record = StatRecord::new(
            &subject,
            ExerciseKind::GestureMatch,
            Outcome {
                result: ResultTag::Exit,
                score: 20,
                time_seconds: 41,
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "maria",
                "age": 67,
                "game_name": "exercise_4",
                "score": 20,
                "time_seconds": 41,
                "result": "exit"
            })
        );
    }

    #[test]
    fn result_tags_are_lowercase() {
        for (tag, s) in [
            (ResultTag::Win, "\"win\""),
            (ResultTag::Lose, "\"lose\""),
            (ResultTag::Completed, "\"completed\""),
            (ResultTag::Exit, "\"exit\""),
        ] {
            assert_eq!(serde_json::to_string(&tag).unwrap(), s);
            assert_eq!(format!("\"{tag}\""), s);
        }
    }
}
