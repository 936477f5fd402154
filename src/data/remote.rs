//! Wire format of the remote quiz feed
//!
//! The feed is a JSON array of quizzes. Each question carries its correct
//! answer as a one-based decimal string, which is converted to a zero-based
//! index when the feed is mapped into [`Quiz`] values.

use serde::{Deserialize, Serialize};

use super::{Question, QuestionId, Quiz, QuizIcon, QuizId};

/// A quiz as it appears in the remote feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteQuiz {
    pub title: String,
    pub desc: String,
    pub questions: Vec<RemoteQuestion>,
}

/// A question as it appears in the remote feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteQuestion {
    pub text: String,
    pub answers: Vec<String>,
    /// One-based index of the correct answer, as a decimal string
    #[serde(default)]
    pub answer: String,
}

impl RemoteQuestion {
    /// Zero-based index of the correct answer
    ///
    /// Unparseable values are read as "1". The result is clamped at zero but
    /// not checked against the number of answers.
    pub fn answer_index(&self) -> usize {
        let raw = self.answer.parse::<i64>().unwrap_or(1);
        raw.saturating_sub(1).max(0) as usize
    }

    fn into_question(self, index: usize) -> Question {
        let correct_index = self.answer_index();
        Question {
            id: QuestionId(index),
            text: self.text,
            options: self.answers,
            correct_index,
        }
    }
}

impl RemoteQuiz {
    fn into_quiz(self, index: usize) -> Quiz {
        let icon = QuizIcon::for_title(&self.title);
        Quiz {
            id: QuizId(index),
            title: self.title,
            description: self.desc,
            icon,
            questions: self
                .questions
                .into_iter()
                .enumerate()
                .map(|(i, q)| q.into_question(i))
                .collect(),
        }
    }
}

/// Decodes a feed body into the local quiz model
///
/// Used for both network responses and the cache file, so both paths produce
/// identical lists for identical bytes.
pub fn decode_quizzes(bytes: &[u8]) -> Result<Vec<Quiz>, serde_json::Error> {
    let remote: Vec<RemoteQuiz> = serde_json::from_slice(bytes)?;
    Ok(remote
        .into_iter()
        .enumerate()
        .map(|(i, rq)| rq.into_quiz(i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_question(answer: &str) -> RemoteQuestion {
        RemoteQuestion {
            text: "Pick one".to_string(),
            answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: answer.to_string(),
        }
    }

    const SAMPLE_FEED: &str = r#"[
        {
            "title": "Science!",
            "desc": "Because SCIENCE!",
            "questions": [
                {
                    "text": "What is fire?",
                    "answer": "1",
                    "answers": [
                        "One of the four classical elements",
                        "A magical reaction given to us by God",
                        "A band that hasn't yet been discovered",
                        "Fire! Fire! Fire! heh-heh"
                    ]
                }
            ]
        },
        {
            "title": "Marvel Super Heroes",
            "desc": "Avengers, Assemble!",
            "questions": [
                {
                    "text": "Who is Iron Man?",
                    "answer": "1",
                    "answers": ["Tony Stark", "Obadiah Stane", "A rock hit by Megadeth", "Nobody knows"]
                },
                {
                    "text": "Who founded the X-Men?",
                    "answer": "2",
                    "answers": ["Tony Stark", "Professor X", "The X-Institute", "Erik Lensherr"]
                }
            ]
        },
        {
            "title": "Mathematics",
            "desc": "Did you pass the third grade?",
            "questions": [
                {
                    "text": "What is 2+2?",
                    "answer": "1",
                    "answers": ["4", "22", "An irrational number", "Nobody knows"]
                }
            ]
        }
    ]"#;

    #[test]
    fn test_answer_index_is_one_based() {
        assert_eq!(remote_question("1").answer_index(), 0);
        assert_eq!(remote_question("2").answer_index(), 1);
        assert_eq!(remote_question("4").answer_index(), 3);
    }

    #[test]
    fn test_answer_index_defaults_on_parse_failure() {
        assert_eq!(remote_question("").answer_index(), 0);
        assert_eq!(remote_question("two").answer_index(), 0);
        assert_eq!(remote_question("1.5").answer_index(), 0);
    }

    #[test]
    fn test_answer_index_clamps_at_zero() {
        assert_eq!(remote_question("0").answer_index(), 0);
        assert_eq!(remote_question("-3").answer_index(), 0);
    }

    #[test]
    fn test_answer_index_has_no_upper_clamp() {
        assert_eq!(remote_question("9").answer_index(), 8);
    }

    #[test]
    fn test_missing_answer_field_defaults_to_first_option() {
        let json = r#"[{"title": "T", "desc": "D", "questions": [{"text": "Q", "answers": ["x", "y"]}]}]"#;
        let quizzes = decode_quizzes(json.as_bytes()).expect("missing answer should decode");
        assert_eq!(quizzes[0].questions[0].correct_index, 0);
    }

    #[test]
    fn test_decode_sample_feed() {
        let quizzes = decode_quizzes(SAMPLE_FEED.as_bytes()).expect("sample feed should decode");

        assert_eq!(quizzes.len(), 3);
        assert_eq!(quizzes[0].title, "Science!");
        assert_eq!(quizzes[0].description, "Because SCIENCE!");
        assert_eq!(quizzes[0].icon, QuizIcon::Science);
        assert_eq!(quizzes[1].icon, QuizIcon::Marvel);
        assert_eq!(quizzes[2].icon, QuizIcon::Math);

        let marvel = &quizzes[1];
        assert_eq!(marvel.question_count(), 2);
        assert_eq!(marvel.questions[1].correct_index, 1);
        assert_eq!(marvel.questions[1].correct_option(), Some("Professor X"));
    }

    #[test]
    fn test_decode_assigns_positional_ids() {
        let quizzes = decode_quizzes(SAMPLE_FEED.as_bytes()).unwrap();
        let ids: Vec<QuizId> = quizzes.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![QuizId(0), QuizId(1), QuizId(2)]);
        assert_eq!(quizzes[1].questions[1].id, QuestionId(1));
    }

    #[test]
    fn test_decode_same_bytes_twice_is_identical() {
        let first = decode_quizzes(SAMPLE_FEED.as_bytes()).unwrap();
        let second = decode_quizzes(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_rejects_schema_mismatch() {
        assert!(decode_quizzes(br#"{"title": "not an array"}"#).is_err());
        assert!(decode_quizzes(br#"[{"title": "no desc", "questions": []}]"#).is_err());
        assert!(decode_quizzes(b"<html>502</html>").is_err());
    }

    #[test]
    fn test_decode_empty_array() {
        let quizzes = decode_quizzes(b"[]").unwrap();
        assert!(quizzes.is_empty());
    }
}
