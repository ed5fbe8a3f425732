//! Screening test generation.
//!
//! Single purpose: produce a templated screening test from the analyzed
//! job's technical topics. Delivery to candidates happens outside the
//! pipeline; only the test content is generated here.

use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::evaluation::{ScreeningTest, TestGenInput, TestQuestion};
use talentgate_core::task::AgentTask;

/// Generates templated screening questions per technical topic.
#[derive(Debug, Default)]
pub struct TestGenerator;

/// Question templates, cycled as topics repeat.
const TEMPLATES: [&str; 3] = [
    "Describe a production system you built or operated using {topic}, and the main tradeoff you faced.",
    "What failure modes have you seen with {topic}, and how did you detect and mitigate them?",
    "Walk through how you would evaluate whether {topic} fits a new project's requirements.",
];

impl AgentTask for TestGenerator {
    type Input = TestGenInput;
    type Output = ScreeningTest;

    fn kind(&self) -> &str {
        "TestGenerator"
    }

    fn description(&self) -> &str {
        "Generates templated screening tests from the job's technical topics"
    }

    fn validate(&self, input: &TestGenInput) -> PipelineResult<()> {
        if input.question_count == 0 {
            return Err(PipelineError::InvalidInput {
                reason: "question_count must be at least 1".to_string(),
            });
        }
        if input.job.technical_topics.is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "job has no technical topics to generate questions from".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &TestGenInput) -> PipelineResult<(ScreeningTest, f64, String)> {
        let topics = &input.job.technical_topics;
        let mut questions = Vec::with_capacity(input.question_count);
        for i in 0..input.question_count {
            let topic = &topics[i % topics.len()];
            let template = TEMPLATES[(i / topics.len()) % TEMPLATES.len()];
            questions.push(TestQuestion {
                question_id: format!("q{}", i + 1),
                topic: topic.clone(),
                prompt: template.replace("{topic}", topic),
                // The evaluator checks that the answer engages the topic.
                expected_answer: topic.clone(),
            });
        }

        debug!(
            job_id = %input.job.job_id,
            questions = questions.len(),
            topics = topics.len(),
            "screening test generated"
        );

        let test = ScreeningTest {
            test_id: format!("test-{}", input.job.job_id),
            job_id: input.job.job_id.clone(),
            questions,
        };

        let explanation = format!(
            "Generated {} screening questions over {} technical topics for job {}.",
            test.questions.len(),
            topics.len(),
            input.job.job_id
        );

        Ok((test, 0.8, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::evaluation::TestGenInput;
    use talentgate_contracts::job::{AnalyzedJob, EducationLevel};
    use talentgate_core::task::AgentTask;

    use super::TestGenerator;

    fn job(topics: &[&str]) -> AnalyzedJob {
        AnalyzedJob {
            job_id: "job-1".to_string(),
            title_normalized: "backend engineer".to_string(),
            skills: vec![],
            min_experience_months: 0,
            min_education: EducationLevel::None,
            technical_topics: topics.iter().map(|t| t.to_string()).collect(),
            bias_flags: vec![],
            quality_score: 0.8,
        }
    }

    #[test]
    fn cycles_topics_to_fill_question_count() {
        let input = TestGenInput {
            job: job(&["rust", "postgresql"]),
            question_count: 5,
        };
        let (test, _, _) = TestGenerator.execute(&input).unwrap();

        assert_eq!(test.questions.len(), 5);
        assert_eq!(test.test_id, "test-job-1");
        let topics: Vec<&str> = test.questions.iter().map(|q| q.topic.as_str()).collect();
        assert_eq!(topics, vec!["rust", "postgresql", "rust", "postgresql", "rust"]);
        // Repeats of a topic draw a different template.
        assert_ne!(test.questions[0].prompt, test.questions[2].prompt);
    }

    #[test]
    fn prompts_mention_their_topic() {
        let input = TestGenInput {
            job: job(&["kubernetes"]),
            question_count: 3,
        };
        let (test, _, _) = TestGenerator.execute(&input).unwrap();
        for q in &test.questions {
            assert!(q.prompt.contains("kubernetes"));
            assert_eq!(q.expected_answer, "kubernetes");
        }
        assert_eq!(test.questions[2].question_id, "q3");
    }

    #[test]
    fn topicless_job_is_rejected() {
        let input = TestGenInput {
            job: job(&[]),
            question_count: 5,
        };
        assert!(TestGenerator.validate(&input).is_err());

        let input = TestGenInput {
            job: job(&["rust"]),
            question_count: 0,
        };
        assert!(TestGenerator.validate(&input).is_err());
    }
}
