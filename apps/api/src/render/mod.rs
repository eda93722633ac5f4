//! HTML rendering for the single résumé page.
//!
//! `PageView` is built from a handler's result and rendered through the askama
//! template in `templates/index.html`, which escapes every interpolated value.

use askama::Template;

use crate::assistant::{Feature, FeatureOutput, InterviewKind};
use crate::search::{JobListing, JobSearchReport, TitleOutcome};

pub const PAGE_TITLE: &str = "Job Genie – AI Resume & Hiring Assistant";
pub const SKILL_TEST_URL: &str = "https://skill-proof-u76q.vercel.app/";

/// One row of the expandable job list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub index: usize,
    pub title: String,
    pub company: String,
    pub source: String,
    pub url: String,
    pub has_url: bool,
}

impl ListingRow {
    fn new(index: usize, listing: &JobListing) -> Self {
        Self {
            index,
            title: listing.title.clone(),
            company: listing.company.clone(),
            source: listing.source.clone(),
            url: listing.url.clone().unwrap_or_default(),
            has_url: listing.url.is_some(),
        }
    }
}

#[derive(Template, Debug, Default)]
#[template(path = "index.html")]
pub struct PageView {
    pub page_title: &'static str,
    pub skill_test_url: &'static str,
    /// Form state, so the radios stay where the user left them.
    pub selected_mode: &'static str,
    pub selected_kind: &'static str,
    pub file_name: String,
    pub info: String,
    pub error: String,
    /// Which result section to show: "", "evaluation", "job_search" or "interview".
    pub section: &'static str,
    pub heading: &'static str,
    pub evaluation: String,
    pub listings: Vec<ListingRow>,
    pub search_notes: Vec<String>,
    pub questions: Vec<String>,
}

impl PageView {
    fn blank(feature: Feature) -> Self {
        let kind = match feature {
            Feature::Interview(kind) => kind,
            _ => InterviewKind::default(),
        };
        Self {
            page_title: PAGE_TITLE,
            skill_test_url: SKILL_TEST_URL,
            selected_mode: feature.mode(),
            selected_kind: kind.as_str(),
            ..Self::default()
        }
    }

    /// Nothing uploaded yet.
    pub fn landing(feature: Feature) -> Self {
        Self {
            info: "📁 Upload a resume to get started".to_string(),
            ..Self::blank(feature)
        }
    }

    /// Something went wrong before any output existed.
    pub fn failed(feature: Feature, file_name: &str, message: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            error: message,
            ..Self::blank(feature)
        }
    }

    pub fn with_output(feature: Feature, file_name: &str, output: &FeatureOutput) -> Self {
        let mut view = Self {
            file_name: file_name.to_string(),
            ..Self::blank(feature)
        };

        match output {
            FeatureOutput::Evaluation { text } => {
                view.section = "evaluation";
                view.heading = "📊 Resume Evaluation";
                view.evaluation = text.clone();
            }
            FeatureOutput::JobSearch { report } => {
                view.section = "job_search";
                view.heading = "🔍 Job Opportunities";
                view.listings = report
                    .listings
                    .iter()
                    .enumerate()
                    .map(|(i, listing)| ListingRow::new(i + 1, listing))
                    .collect();
                view.search_notes = search_notes(report);
                if view.listings.is_empty() {
                    view.info = "No jobs found".to_string();
                }
            }
            FeatureOutput::Interview { questions, .. } => {
                view.section = "interview";
                view.heading = "🎤 Interview Preparation";
                view.questions = questions.clone();
            }
        }

        view
    }
}

/// One line per title that did not produce results for a reason worth showing.
fn search_notes(report: &JobSearchReport) -> Vec<String> {
    if report.is_disabled() {
        return vec!["Job search is not configured on this server.".to_string()];
    }
    report
        .titles
        .iter()
        .filter_map(|t| match &t.outcome {
            TitleOutcome::Failed { reason } => {
                Some(format!("Search for \"{}\" failed: {reason}", t.title))
            }
            _ => None,
        })
        .collect()
}
