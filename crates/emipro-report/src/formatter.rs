// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns one backend response into a section's content and sources.

use std::collections::HashSet;

use emipro_core::{GenerationResponse, GroundingCitation, SectionContent, SectionResult, Source};
use serde::Deserialize;
use tracing::warn;

use crate::catalog::{Topic, TopicKind};
use crate::html::escape;

/// Content shown in place of a structured section whose JSON could not be read.
pub const STRUCTURED_FORMAT_ERROR: &str = "Error: Could not display financial data. The data received was not in the correct format. Please try generating the report again.";

/// Builds the section for `topic` from the backend's answer.
///
/// Never fails: unreadable structured output degrades to
/// [`STRUCTURED_FORMAT_ERROR`].
pub fn format_section(topic: &Topic, response: GenerationResponse) -> SectionResult {
    let content = match topic.kind {
        TopicKind::Freeform { .. } => SectionContent::Markdown(response.text),
        TopicKind::Structured { .. } => match serde_json::from_str::<FinancePlan>(&response.text) {
            Ok(plan) => SectionContent::Html(render_finance_plan(&plan)),
            Err(e) => {
                warn!(topic = topic.id, error = %e, "structured response is not valid JSON");
                SectionContent::Markdown(STRUCTURED_FORMAT_ERROR.to_string())
            }
        },
    };

    SectionResult {
        id: topic.id.to_string(),
        title: topic.title.to_string(),
        content,
        sources: extract_sources(&response.citations),
    }
}

/// Keeps citations with both a title and a URI, first occurrence per URI wins.
pub fn extract_sources(citations: &[GroundingCitation]) -> Vec<Source> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter_map(|c| match (c.title.as_deref(), c.uri.as_deref()) {
            (Some(title), Some(uri)) if !title.is_empty() && !uri.is_empty() => Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            }),
            _ => None,
        })
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}

/// Structured finance answer. Every field is optional so partial answers still render.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancePlan {
    pub currency_name: Option<String>,
    pub currency_code: Option<String>,
    pub budget_items: Vec<BudgetItem>,
    pub import_duties: Option<String>,
    pub tax_optimization_strategies: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetItem {
    pub category: String,
    pub item: String,
    pub initial_setup_cost: String,
    pub monthly_ongoing_cost: String,
    pub six_month_total: String,
    pub notes: String,
}

/// Groups items by category in first-seen order; blank categories become "Other".
pub fn group_by_category(items: &[BudgetItem]) -> Vec<(&str, Vec<&BudgetItem>)> {
    let mut groups: Vec<(&str, Vec<&BudgetItem>)> = Vec::new();
    for item in items {
        let category = match item.category.trim() {
            "" => "Other",
            c => c,
        };
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category, vec![item])),
        }
    }
    groups
}

/// Renders the finance answer as HTML: conversion link, budget table, and text blocks.
pub fn render_finance_plan(plan: &FinancePlan) -> String {
    let mut html = String::new();

    let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    if let (Some(name), Some(code)) = (non_empty(&plan.currency_name), non_empty(&plan.currency_code)) {
        let query: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
        html.push_str(&format!(
            r#"<div class="currency-conversion"><a href="https://www.google.com/search?q=convert+{query}+to+usd" target="_blank" rel="noopener noreferrer" aria-label="Convert {name} to USD">Convert {name} ({code}) to USD</a></div>"#,
            name = escape(&name),
            code = escape(&code),
        ));
    }

    html.push_str(
        r#"<table class="budget"><thead><tr><th>Category / Item</th><th>Initial Setup (Month 1)</th><th>Monthly Ongoing (Months 1-6)</th><th>6-Month Total</th><th>Notes</th></tr></thead><tbody>"#,
    );
    for (category, items) in group_by_category(&plan.budget_items) {
        html.push_str(&format!(
            r#"<tr class="category"><td colspan="5"><strong>{}</strong></td></tr>"#,
            escape(category)
        ));
        for item in items {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&item.item),
                escape(&item.initial_setup_cost),
                escape(&item.monthly_ongoing_cost),
                escape(&item.six_month_total),
                escape(&item.notes),
            ));
        }
    }
    html.push_str("</tbody></table>");

    for (heading, text) in [
        ("Import Duties", &plan.import_duties),
        ("Tax Optimization Strategies", &plan.tax_optimization_strategies),
    ] {
        if let Some(text) = non_empty(text) {
            html.push_str(&format!(
                "<h3>{heading}</h3><p>{}</p>",
                escape(&text).replace('\n', "<br/>")
            ));
        }
    }

    html
}
