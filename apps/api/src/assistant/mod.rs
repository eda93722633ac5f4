//! Résumé assistant — one request in, one feature's output back.
//! All LLM calls go through `ChatModel`; all web searches through `WebSearch`.

pub mod handlers;
pub mod prompts;

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::assistant::prompts::PromptTemplate;
use crate::errors::AppError;
use crate::llm_client::{ChatModel, LlmError};
use crate::resume::ResumeText;
use crate::search::{search_jobs, JobSearchReport, WebSearch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewKind {
    #[default]
    Technical,
    NonTechnical,
}

impl InterviewKind {
    fn template(self) -> PromptTemplate {
        match self {
            InterviewKind::Technical => PromptTemplate::TechnicalQuestions,
            InterviewKind::NonTechnical => PromptTemplate::NonTechnicalQuestions,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewKind::Technical => "technical",
            InterviewKind::NonTechnical => "non_technical",
        }
    }
}

impl FromStr for InterviewKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "technical" => Ok(InterviewKind::Technical),
            "non_technical" => Ok(InterviewKind::NonTechnical),
            other => Err(AppError::Validation(format!(
                "Unknown interview type '{other}'"
            ))),
        }
    }
}

/// The three mutually exclusive things the page can do with a résumé.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feature {
    #[default]
    Evaluation,
    JobSearch,
    Interview(InterviewKind),
}

impl Feature {
    /// Builds a feature from the raw form values; missing values take the defaults.
    pub fn from_form(mode: Option<&str>, interview_kind: Option<&str>) -> Result<Self, AppError> {
        match mode.unwrap_or("") {
            "" | "evaluation" => Ok(Feature::Evaluation),
            "job_search" => Ok(Feature::JobSearch),
            "interview" => Ok(Feature::Interview(
                interview_kind.unwrap_or("").parse()?,
            )),
            other => Err(AppError::Validation(format!("Unknown mode '{other}'"))),
        }
    }

    pub fn mode(self) -> &'static str {
        match self {
            Feature::Evaluation => "evaluation",
            Feature::JobSearch => "job_search",
            Feature::Interview(_) => "interview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeatureOutput {
    Evaluation {
        text: String,
    },
    JobSearch {
        report: JobSearchReport,
    },
    Interview {
        kind: InterviewKind,
        questions: Vec<String>,
    },
}

/// The collaborators a feature needs, borrowed from `AppState` per request.
pub struct FeatureContext<'a> {
    pub llm: &'a dyn ChatModel,
    pub search: &'a dyn WebSearch,
    pub search_interval: Duration,
}

async fn ask(
    llm: &dyn ChatModel,
    template: PromptTemplate,
    resume: &ResumeText,
) -> Result<String, LlmError> {
    llm.complete(&template.render(resume.as_str())).await
}

/// Score and critique, returned verbatim.
pub async fn evaluate_resume(llm: &dyn ChatModel, resume: &ResumeText) -> Result<String, LlmError> {
    ask(llm, PromptTemplate::Evaluation, resume).await
}

/// Raw job-title suggestions, one per line as the model wrote them.
pub async fn suggest_job_titles(
    llm: &dyn ChatModel,
    resume: &ResumeText,
) -> Result<String, LlmError> {
    ask(llm, PromptTemplate::JobTitles, resume).await
}

pub async fn interview_questions(
    llm: &dyn ChatModel,
    resume: &ResumeText,
    kind: InterviewKind,
) -> Result<Vec<String>, LlmError> {
    let raw = ask(llm, kind.template(), resume).await?;
    Ok(question_lines(&raw))
}

/// Nonempty lines of a model reply, in order.
pub fn question_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

pub async fn run_feature(
    feature: Feature,
    resume: &ResumeText,
    ctx: &FeatureContext<'_>,
) -> Result<FeatureOutput, LlmError> {
    info!("Running feature '{}'", feature.mode());

    match feature {
        Feature::Evaluation => Ok(FeatureOutput::Evaluation {
            text: evaluate_resume(ctx.llm, resume).await?,
        }),
        Feature::JobSearch => {
            let titles = suggest_job_titles(ctx.llm, resume).await?;
            let report = search_jobs(&titles, ctx.search, ctx.search_interval).await;
            Ok(FeatureOutput::JobSearch { report })
        }
        Feature::Interview(kind) => Ok(FeatureOutput::Interview {
            kind,
            questions: interview_questions(ctx.llm, resume, kind).await?,
        }),
    }
}
