// All LLM prompt templates for the résumé assistant.
// Each template has exactly one slot, `{context}`, filled with the résumé text.

const CONTEXT_SLOT: &str = "{context}";

pub const EVALUATION_PROMPT: &str = "Analyze this resume and provide ONLY:
1. Resume Score (out of 10)
2. Key Changes Needed (3 bullet points)
3. Eligible Job Roles (3 roles)

Resume:
{context}
";

pub const JOB_TITLES_PROMPT: &str = "Based on this resume, give ONLY 3 job titles (one per line).

Resume:
{context}
";

pub const TECHNICAL_QUESTIONS_PROMPT: &str = "Generate exactly 10 technical interview questions.
Only questions. No answers.

Resume:
{context}
";

pub const NON_TECHNICAL_QUESTIONS_PROMPT: &str = "Generate exactly 10 non-technical interview questions.
Only questions. No answers.

Resume:
{context}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    Evaluation,
    JobTitles,
    TechnicalQuestions,
    NonTechnicalQuestions,
}

impl PromptTemplate {
    pub fn template(self) -> &'static str {
        match self {
            PromptTemplate::Evaluation => EVALUATION_PROMPT,
            PromptTemplate::JobTitles => JOB_TITLES_PROMPT,
            PromptTemplate::TechnicalQuestions => TECHNICAL_QUESTIONS_PROMPT,
            PromptTemplate::NonTechnicalQuestions => NON_TECHNICAL_QUESTIONS_PROMPT,
        }
    }

    /// Substitutes `context` verbatim into the template's slot.
    pub fn render(self, context: &str) -> String {
        self.template().replacen(CONTEXT_SLOT, context, 1)
    }
}
