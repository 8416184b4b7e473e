use super::{CommentaryRequest, NarrativeKind};
use crate::engine::Scenario;

/// Section labels the analysis prompt asks for; the CLI renders them as
/// headings when the model follows the format
pub const ANALYSIS_SECTIONS: [&str; 3] = ["Key Drivers", "Risks", "Recommendation"];

fn scenario_context(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Translation => {
            "an AI translation workload: a one-time backlog translation plus recurring monthly \
             translation of new documents, with optional human review of a fraction of the output"
        }
        Scenario::Rag => {
            "a retrieval-augmented generation system across its lifecycle: a one-time build \
             (parsing and embedding), monthly run costs (query embedding, vector database, \
             reranking, inference) and monthly governance (monitoring, evaluation, human review, \
             re-indexing)"
        }
        Scenario::Roi => {
            "the return on investment of an AI assistant: productivity value from time saved \
             against the monthly cost of inference, orchestration and governance, with \
             conservative and optimistic variants"
        }
    }
}

pub fn system_prompt(kind: NarrativeKind) -> String {
    let base = "You are a financial analyst explaining AI cost projections to business \
                stakeholders. Only use figures present in the data you are given. Amounts are \
                in US dollars.";

    let task = match kind {
        NarrativeKind::Analysis => format!(
            "Write a concise analysis in three sections, each starting on its own line with a \
             bold label followed by a colon: {}.",
            ANALYSIS_SECTIONS
                .iter()
                .map(|label| format!("**{}**:", label))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        NarrativeKind::ExecutiveSummary => {
            "Write an executive summary of at most three sentences.".to_string()
        }
        NarrativeKind::GraphTrend => {
            "Describe the shape of the 12-month projection in one or two sentences.".to_string()
        }
        NarrativeKind::MonthlyNarration => {
            "Narrate the 12-month projection with one short line per month, each line starting \
             with 'Month N:'."
                .to_string()
        }
    };

    format!("{} {}", base, task)
}

pub fn user_prompt(request: &CommentaryRequest) -> String {
    let snapshot = serde_json::to_string_pretty(&request.snapshot)
        .unwrap_or_else(|_| request.snapshot.to_string());

    format!(
        "The following is a cost model of {}.\n\n```json\n{}\n```",
        scenario_context(request.scenario),
        snapshot
    )
}
