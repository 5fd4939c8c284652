// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed, ordered catalog of report topics.
//!
//! Each topic is either freeform (web-grounded prose) or structured (JSON
//! constrained by a response schema). The catalog order is the order sections
//! are generated and shown in, whatever order the user picked them in.

use emipro_core::{EmiproError, GenerationRequest, Profile};
use serde_json::{json, Value};

/// Builds the prompt text for a profile.
pub type PromptBuilder = fn(&Profile) -> String;

/// How a topic is generated and formatted.
#[derive(Debug, Clone, Copy)]
pub enum TopicKind {
    /// Web-grounded text, shown as markdown.
    Freeform { prompt: PromptBuilder },
    /// JSON matching `schema`, shown as a formatted table.
    Structured {
        prompt: PromptBuilder,
        schema: fn() -> Value,
    },
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: TopicKind,
}

impl Topic {
    pub fn prompt(&self, profile: &Profile) -> String {
        match self.kind {
            TopicKind::Freeform { prompt } | TopicKind::Structured { prompt, .. } => {
                prompt(profile)
            }
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.kind, TopicKind::Structured { .. })
    }

    /// The backend request for this topic and profile.
    pub fn request(&self, profile: &Profile) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt(profile),
            response_schema: match self.kind {
                TopicKind::Freeform { .. } => None,
                TopicKind::Structured { schema, .. } => Some(schema()),
            },
        }
    }
}

static CATALOG: [Topic; 4] = [
    Topic {
        id: "healthcare",
        title: "Healthcare Mapping",
        description: "Get a detailed overview of healthcare facilities, insurance providers, and emergency procedures in your chosen city.",
        kind: TopicKind::Freeform {
            prompt: healthcare_prompt,
        },
    },
    Topic {
        id: "finance",
        title: "Precise Financial Planning",
        description: "Receive a comprehensive financial plan including budgets, housing costs, import duties, and tax considerations.",
        kind: TopicKind::Structured {
            prompt: finance_prompt,
            schema: finance_schema,
        },
    },
    Topic {
        id: "situation",
        title: "Personal Situation Analysis",
        description: "An assessment of the job market for your profession, immigration factors, timelines, and potential risks.",
        kind: TopicKind::Freeform {
            prompt: situation_prompt,
        },
    },
    Topic {
        id: "visa",
        title: "Visa & Immigration Guide",
        description: "Understand the visa options, application process, and documentation needed for your move.",
        kind: TopicKind::Freeform {
            prompt: visa_prompt,
        },
    },
];

/// All topics in canonical order.
pub fn topics() -> &'static [Topic] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Topic> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Position of `id` in the catalog, used to re-sort sections.
pub fn position(id: &str) -> Option<usize> {
    CATALOG.iter().position(|t| t.id == id)
}

/// Resolves selected identifiers to topics in catalog order.
///
/// Duplicates collapse; any unknown identifier is an error.
pub fn resolve<S: AsRef<str>>(ids: &[S]) -> Result<Vec<&'static Topic>, EmiproError> {
    if let Some(unknown) = ids.iter().map(|id| id.as_ref()).find(|id| find(id).is_none()) {
        return Err(EmiproError::UnknownTopic(unknown.to_string()));
    }
    Ok(CATALOG
        .iter()
        .filter(|t| ids.iter().any(|id| id.as_ref() == t.id))
        .collect())
}

fn healthcare_prompt(p: &Profile) -> String {
    let (age, city, country) = (&p.age, &p.destination_city, &p.destination_country);
    format!(
        "Generate a detailed healthcare mapping report for a {age}-year-old individual moving to {city}, {country}.
The report should be professional, well-structured, and easy to read.
Focus on the following areas:
1. **Quality Hospitals in the City:** Identify and describe the top 3-5 hospitals in {city}. For each hospital, provide its specialty, reputation, and address.
2. **Insurance Providers:** List and compare at least 3 major health insurance providers that offer plans in {city} and have dedicated English-speaking customer support. Detail the types of plans they offer (e.g., inpatient, outpatient, emergency).
3. **Emergency Procedures:** Outline the standard emergency contact procedures. Include the primary emergency phone number (like 911 or 112), and the locations of 24/7 emergency rooms in central or easily accessible areas of {city}.
Use markdown for formatting, including headers, bold text, and lists."
    )
}

fn finance_prompt(p: &Profile) -> String {
    let (age, profession, city, country, lifestyle) = (
        &p.age,
        &p.profession,
        &p.destination_city,
        &p.destination_country,
        p.lifestyle,
    );
    format!(
        "Create a precise financial planning report for a {age}-year-old individual with a profession in '{profession}' moving to {city}, {country}, with a '{lifestyle}' lifestyle.

Respond with a JSON object that matches the provided schema. Make sure to include the local 'currencyName' and 'currencyCode' for {country}.

Your analysis should be comprehensive and cover these specific points:
1. **6-Month Transition Budget:** Create an itemized budget for the first six months. This should be an array of objects in the 'budgetItems' field. Include categories like Housing (rent, security deposit, agency fees), Utilities (electricity, water, internet, mobile), Initial Setup Costs (furniture, bank account setup), and Living Expenses (groceries, transport, healthcare, leisure). For each item, provide estimates for initial setup, monthly ongoing, and 6-month total costs, along with relevant notes. The costs should be in the local currency.
2. **Import Duties:** In the 'importDuties' field, provide a string explaining the process and potential costs of importing personal belongings into {country}.
3. **Tax Optimization Strategies:** In the 'taxOptimizationStrategies' field, provide a string with an overview of the personal income tax system in {country} and suggest 2-3 common legal tax optimization strategies for a foreign professional.

Base your cost estimates on the provided lifestyle: '{lifestyle}'. Ensure all numeric fields in the JSON are represented as strings to accommodate currency symbols and variations like 'Varies'."
    )
}

fn situation_prompt(p: &Profile) -> String {
    let (age, profession, city, country) = (
        &p.age,
        &p.profession,
        &p.destination_city,
        &p.destination_country,
    );
    format!(
        "Conduct a professional situation analysis for a {age}-year-old '{profession}' planning to immigrate to {city}, {country}.
The analysis should be personalized and actionable.
Address the following sections:
1. **Job Market Analysis:** Analyze the current job market for a '{profession}' in {city}. Mention key companies, expected salary ranges, and demand for this profession.
2. **Age-Specific Immigration Advantages:** Discuss any specific advantages, disadvantages, or considerations related to being {age} years old in the context of immigrating to {country}. This could relate to visa types, social integration, or healthcare.
3. **Timeline Optimization:** Propose an optimized, step-by-step timeline for the move, starting from 6 months before the planned departure date. Include key milestones like visa application, job search, and securing accommodation.
4. **Risk Assessment and Mitigation:** Identify 3-4 potential risks for this specific move (e.g., visa rejection, difficulty finding a job, cultural adjustment). For each risk, suggest a practical mitigation strategy.
Use markdown for formatting, including headers, bold text, and lists."
    )
}

fn visa_prompt(p: &Profile) -> String {
    let (age, profession, city, country) = (
        &p.age,
        &p.profession,
        &p.destination_city,
        &p.destination_country,
    );
    format!(
        "Generate a comprehensive Visa and Immigration guide for a {age}-year-old '{profession}' moving to {city}, {country}.
The guide should be clear, well-structured, and professional.
Address the following key points:
1. **Primary Visa Options:** Identify and detail the most relevant visa or work permit options for a '{profession}'. Explain the eligibility criteria for each.
2. **Application Process:** Provide a step-by-step guide on how to apply for the most common visa type from their home country. Include where to apply (e.g., embassy, online portal).
3. **Required Documentation Checklist:** Create a clear checklist of all necessary documents. This should include items like passport validity, proof of funds, employment contract, educational certificates, and any required translations or apostilles.
4. **Timelines and Costs:** Provide estimated processing times for the visa application and a breakdown of associated costs (application fees, legal fees, etc.).
5. **Key Considerations:** Mention 2-3 important considerations or potential hurdles in the immigration process for {country}, such as interviews, medical exams, or police clearance certificates.
Use markdown for formatting, including headers, bold text, and lists for clarity."
    )
}

/// Response schema for the finance topic.
///
/// Costs are strings so answers like "Varies" or "€1.200" survive.
pub fn finance_schema() -> Value {
    let text = |description: &str| json!({ "type": "STRING", "description": description });
    json!({
        "type": "OBJECT",
        "properties": {
            "currencyName": text("The official name of the local currency in the destination country (e.g., 'Euro')."),
            "currencyCode": text("The 3-letter ISO 4217 currency code for the local currency (e.g., 'EUR')."),
            "budgetItems": {
                "type": "ARRAY",
                "description": "A list of budget items for various expense categories.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": text("Main category of the expense (e.g., Housing, Utilities, Living Expenses)."),
                        "item": text("Specific item within the category (e.g., Rent (1-bedroom), Groceries)."),
                        "initialSetupCost": text("Estimated cost for the first month. Can be a number, 'Varies', or '-'."),
                        "monthlyOngoingCost": text("Estimated ongoing monthly cost. Can be a number, 'Varies', or '-'."),
                        "sixMonthTotal": text("Total estimated cost for 6 months. Can be a number, 'Varies', or '-'."),
                        "notes": text("Additional notes or details about the item.")
                    },
                    "required": ["category", "item", "initialSetupCost", "monthlyOngoingCost", "sixMonthTotal", "notes"]
                }
            },
            "importDuties": text("An explanation of the process and potential costs of importing personal belongings."),
            "taxOptimizationStrategies": text("An overview of the personal income tax system and common legal tax optimization strategies.")
        },
        "required": ["currencyName", "currencyCode", "budgetItems", "importDuties", "taxOptimizationStrategies"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emipro_core::Lifestyle;

    fn profile() -> Profile {
        Profile {
            destination_country: "Portugal".into(),
            destination_city: "Lisbon".into(),
            profession: "Nurse".into(),
            age: "42".into(),
            lifestyle: Lifestyle::Luxury,
        }
    }

    #[test]
    fn catalog_order_is_fixed() {
        let ids: Vec<_> = topics().iter().map(|t| t.id).collect();
        assert_eq!(ids, ["healthcare", "finance", "situation", "visa"]);
    }

    #[test]
    fn only_finance_is_structured() {
        let structured: Vec<_> = topics()
            .iter()
            .filter(|t| t.is_structured())
            .map(|t| t.id)
            .collect();
        assert_eq!(structured, ["finance"]);
    }

    #[test]
    fn resolve_uses_catalog_order() {
        let resolved = resolve(&["visa", "healthcare", "finance"]).unwrap();
        let ids: Vec<_> = resolved.iter().map(|t| t.id).collect();
        assert_eq!(ids, ["healthcare", "finance", "visa"]);
    }

    #[test]
    fn resolve_collapses_duplicates() {
        assert_eq!(resolve(&["visa", "visa"]).unwrap().len(), 1);
    }

    #[test]
    fn resolve_rejects_unknown_ids() {
        let err = resolve(&["healthcare", "weather"]).unwrap_err();
        assert!(matches!(err, EmiproError::UnknownTopic(id) if id == "weather"));
    }

    #[test]
    fn prompts_interpolate_profile() {
        let prompt = find("finance").unwrap().prompt(&profile());
        assert!(prompt.contains("42-year-old"));
        assert!(prompt.contains("'Nurse'"));
        assert!(prompt.contains("Lisbon, Portugal"));
        assert!(prompt.contains("'Luxury' lifestyle"));

        let prompt = find("healthcare").unwrap().prompt(&profile());
        assert!(prompt.contains("top 3-5 hospitals in Lisbon"));
    }

    #[test]
    fn structured_request_carries_schema() {
        let request = find("finance").unwrap().request(&profile());
        let schema = request.response_schema.unwrap();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);

        assert!(find("visa").unwrap().request(&profile()).response_schema.is_none());
    }
}
