// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emipro topics` and `emipro countries`.

use colored::Colorize;
use emipro_core::EmiproError;
use emipro_report::{catalog, geography};

pub fn print_topics() {
    for topic in catalog::topics() {
        let kind = if topic.is_structured() {
            " (structured)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("{}  {}{kind}", topic.id.bold().green(), topic.title);
        println!("    {}", topic.description.dimmed());
    }
}

/// Lists every country, or the sorted cities of `country`.
pub fn print_countries(country: Option<&str>) -> Result<(), EmiproError> {
    let Some(name) = country else {
        for country in geography::countries() {
            println!("{}", country.name);
        }
        return Ok(());
    };

    let country = geography::find_country(name).ok_or_else(|| {
        EmiproError::Validation(format!(
            "{name} is not a supported destination (see `emipro countries`)"
        ))
    })?;
    println!("{}", country.name.bold());
    for city in country.sorted_cities() {
        println!("  {city}");
    }
    Ok(())
}
