// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emipro checkout` command implementation.
//!
//! Validates the profile against the destination catalog, records the topic
//! selection, persists the pending session and prints the payment address.

use std::sync::Arc;

use colored::Colorize;
use emipro_checkout::StripeCheckout;
use emipro_config::EmiproConfig;
use emipro_core::{EmiproError, Lifestyle, Profile};
use emipro_flow::Wizard;
use emipro_report::{catalog, ProfileForm};
use tracing::info;

use crate::CheckoutArgs;

pub async fn run_checkout(config: EmiproConfig, args: CheckoutArgs) -> Result<(), EmiproError> {
    let profile = profile_from_args(&args)?;
    let price = config.payment.price_label.clone();
    let checkout = StripeCheckout::new(&config.payment)?;
    let flow = crate::build_flow(config)?.with_checkout(Arc::new(checkout));

    let mut wizard = Wizard::new();
    wizard.submit_profile(profile);
    wizard.select_topics(args.topics)?;

    println!("{}", "Your report".bold().green());
    for id in wizard.topics() {
        if let Some(topic) = catalog::find(id) {
            println!("  - {}", topic.title);
        }
    }
    println!("Price: {}\n", price.bold());

    let session = flow.start_checkout(&mut wizard).await?;
    info!(session = %session.id, "pending session saved, awaiting payment");

    println!("Complete your payment at:\n  {}\n", session.redirect_url.cyan());
    println!(
        "After paying, run {} with the address you were returned to.",
        "emipro resume <RETURN_URL>".yellow()
    );
    Ok(())
}

fn profile_from_args(args: &CheckoutArgs) -> Result<Profile, EmiproError> {
    let mut form = ProfileForm::new();
    form.set_country(&args.country);
    form.set_city(&args.city)?;
    form.profession = args.profession.clone();
    form.age = args.age.clone();
    form.lifestyle = parse_lifestyle(&args.lifestyle)?;
    form.submit()
}

/// Accepts the display labels case-insensitively, plus `budget`.
fn parse_lifestyle(value: &str) -> Result<Lifestyle, EmiproError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("budget") {
        return Ok(Lifestyle::BudgetConscious);
    }
    Lifestyle::ALL
        .into_iter()
        .find(|tier| tier.to_string().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            EmiproError::Validation(format!(
                "unknown lifestyle `{value}`; choose Budget-conscious, Moderate or Luxury"
            ))
        })
}
