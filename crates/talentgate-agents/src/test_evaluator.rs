//! Screening test evaluation.
//!
//! Single purpose: score one candidate's submission against the test it
//! answers. An answer counts as correct when it engages the question's
//! expected topic; unanswered questions count against the score.

use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::evaluation::{TestScore, TestSubmission};
use talentgate_core::task::AgentTask;

/// Scores screening test submissions.
#[derive(Debug, Default)]
pub struct TestEvaluator;

impl AgentTask for TestEvaluator {
    type Input = TestSubmission;
    type Output = TestScore;

    fn kind(&self) -> &str {
        "TestEvaluator"
    }

    fn description(&self) -> &str {
        "Scores screening test submissions question by question"
    }

    fn validate(&self, input: &TestSubmission) -> PipelineResult<()> {
        if input.candidate_id.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "candidate_id must not be blank".to_string(),
            });
        }
        if input.test.questions.is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "submission references a test with no questions".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &TestSubmission) -> PipelineResult<(TestScore, f64, String)> {
        let total = input.test.questions.len();
        let mut attempted = 0;
        let mut correct = 0;

        for question in &input.test.questions {
            let answer = input
                .answers
                .iter()
                .find(|a| a.question_id == question.question_id);
            let Some(answer) = answer else { continue };
            attempted += 1;
            if answer
                .answer
                .to_lowercase()
                .contains(&question.expected_answer.to_lowercase())
            {
                correct += 1;
            }
        }

        let total_score = correct as f64 / total as f64;

        debug!(
            candidate_id = %input.candidate_id,
            correct,
            attempted,
            total,
            "submission scored"
        );

        let score = TestScore {
            candidate_id: input.candidate_id.clone(),
            test_id: input.test.test_id.clone(),
            total_score,
            correct,
            attempted,
            total,
        };

        let explanation = format!(
            "Candidate {} answered {} of {} questions, {} correct, for a score of {:.2}.",
            input.candidate_id, attempted, total, correct, total_score
        );

        Ok((score, 0.9, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::evaluation::{
        ScreeningTest, TestAnswer, TestQuestion, TestSubmission,
    };
    use talentgate_core::task::AgentTask;

    use super::TestEvaluator;

    fn test() -> ScreeningTest {
        ScreeningTest {
            test_id: "test-job-1".to_string(),
            job_id: "job-1".to_string(),
            questions: vec![
                TestQuestion {
                    question_id: "q1".to_string(),
                    topic: "rust".to_string(),
                    prompt: "Describe a system you built using rust.".to_string(),
                    expected_answer: "rust".to_string(),
                },
                TestQuestion {
                    question_id: "q2".to_string(),
                    topic: "postgresql".to_string(),
                    prompt: "What failure modes have you seen with postgresql?".to_string(),
                    expected_answer: "postgresql".to_string(),
                },
            ],
        }
    }

    fn submission(answers: Vec<(&str, &str)>) -> TestSubmission {
        TestSubmission {
            candidate_id: "c1".to_string(),
            test: test(),
            answers: answers
                .into_iter()
                .map(|(question_id, answer)| TestAnswer {
                    question_id: question_id.to_string(),
                    answer: answer.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn scores_correct_answers_case_insensitively() {
        let (score, _, _) = TestEvaluator
            .execute(&submission(vec![
                ("q1", "I built a storage engine in Rust."),
                ("q2", "Mostly vacuum stalls in PostgreSQL under churn."),
            ]))
            .unwrap();

        assert_eq!(score.correct, 2);
        assert_eq!(score.attempted, 2);
        assert_eq!(score.total_score, 1.0);
    }

    #[test]
    fn unanswered_questions_count_against_the_score() {
        let (score, _, explanation) = TestEvaluator
            .execute(&submission(vec![("q1", "Rust services at scale.")]))
            .unwrap();

        assert_eq!(score.attempted, 1);
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 2);
        assert_eq!(score.total_score, 0.5);
        assert!(explanation.contains("1 of 2"));
    }

    #[test]
    fn off_topic_answers_score_zero() {
        let (score, _, _) = TestEvaluator
            .execute(&submission(vec![
                ("q1", "I prefer spreadsheets."),
                ("q2", "No opinion."),
            ]))
            .unwrap();
        assert_eq!(score.correct, 0);
        assert_eq!(score.total_score, 0.0);
    }

    #[test]
    fn empty_test_is_rejected() {
        let mut bad = submission(vec![]);
        bad.test.questions.clear();
        assert!(TestEvaluator.validate(&bad).is_err());
    }
}
