//! Prompts for run debrief and risk-map generation

use scenario_core::{RunItemStatus, Suite, SuiteItem, SuiteRun, SuiteRunItem};

pub const DEBRIEF_SYSTEM_PROMPT: &str = r#"You are a senior communications strategist.
Your task is to write a post-run debrief for a crisis-simulation suite.

RULES:
1. Ground every claim in the step outcomes provided - no speculation
2. Open with a two-sentence executive summary
3. Call out the highest observed risk level and which step produced it
4. List skipped steps and what their triggers were waiting for
5. Close with three concrete follow-up recommendations
6. Write in professional but accessible language"#;

pub const RISK_MAP_SYSTEM_PROMPT: &str = r#"You are a risk analyst.
Produce a markdown risk map for a completed crisis-simulation run: one table with
columns Step, Risk Level, Key Findings, followed by a short paragraph naming the
dominant risk theme. Use only the data provided."#;

const MAX_FINDINGS_PER_ITEM: usize = 8;

pub fn debrief_prompt(
    suite: &Suite,
    run: &SuiteRun,
    items: &[SuiteItem],
    run_items: &[SuiteRunItem],
) -> String {
    let mut prompt = format!(
        "Suite: {}\nDescription: {}\nRun status: {}\nSteps executed: {} of {}\n\nStep outcomes:\n",
        suite.name,
        suite.description,
        run.status.as_str(),
        run_items
            .iter()
            .filter(|ri| ri.status == RunItemStatus::Completed)
            .count(),
        run.total_items,
    );

    for run_item in run_items {
        let label = items
            .iter()
            .find(|item| item.id == run_item.suite_item_id)
            .map_or("unknown step", |item| item.label.as_str());

        prompt.push_str(&format!(
            "- [{}] {} (status: {}",
            run_item.order_index,
            label,
            run_item.status.as_str()
        ));
        if let Some(risk) = run_item.risk_level {
            prompt.push_str(&format!(", risk: {}", risk.as_str()));
        }
        prompt.push(')');
        for finding in run_item.key_findings.iter().take(MAX_FINDINGS_PER_ITEM) {
            prompt.push_str(&format!("\n  finding: {finding}"));
        }
        prompt.push('\n');
    }

    if let Some(reason) = &run.abort_reason {
        prompt.push_str(&format!("\nRun was aborted: {reason}\n"));
    }

    prompt.push_str("\nWrite the debrief now.");
    prompt
}

pub fn risk_map_prompt(suite: &Suite, items: &[SuiteItem], run_items: &[SuiteRunItem]) -> String {
    let mut prompt = format!("Suite: {}\n\nRecorded steps:\n", suite.name);

    for run_item in run_items {
        let label = items
            .iter()
            .find(|item| item.id == run_item.suite_item_id)
            .map_or("unknown step", |item| item.label.as_str());
        let risk = run_item.risk_level.map_or("unrecorded", |r| r.as_str());
        let findings = run_item
            .key_findings
            .iter()
            .take(MAX_FINDINGS_PER_ITEM)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");

        prompt.push_str(&format!(
            "- {} | status: {} | risk: {} | findings: {}\n",
            label,
            run_item.status.as_str(),
            risk,
            findings
        ));
    }

    prompt.push_str("\nProduce the risk map now.");
    prompt
}
