// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destination catalog and the profile form that validates against it.

use emipro_core::{EmiproError, Lifestyle, Profile};

/// A destination country and the cities offered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    cities: &'static [&'static str],
}

impl Country {
    /// Cities in alphabetical order.
    pub fn sorted_cities(&self) -> Vec<&'static str> {
        let mut cities = self.cities.to_vec();
        cities.sort_unstable();
        cities
    }

    pub fn has_city(&self, city: &str) -> bool {
        self.cities.iter().any(|c| *c == city)
    }
}

const fn country(name: &'static str, cities: &'static [&'static str]) -> Country {
    Country { name, cities }
}

static COUNTRIES: &[Country] = &[
    country("Australia", &["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide"]),
    country("Canada", &["Toronto", "Vancouver", "Montreal", "Calgary", "Ottawa"]),
    country("Germany", &["Berlin", "Munich", "Hamburg", "Frankfurt", "Cologne"]),
    country("Ireland", &["Dublin", "Cork", "Galway", "Limerick"]),
    country("Japan", &["Tokyo", "Osaka", "Kyoto", "Fukuoka", "Sapporo"]),
    country("Mexico", &["Mexico City", "Guadalajara", "Monterrey", "Mérida", "Puerto Vallarta"]),
    country("Netherlands", &["Amsterdam", "Rotterdam", "Utrecht", "The Hague", "Eindhoven"]),
    country("New Zealand", &["Auckland", "Wellington", "Christchurch", "Queenstown"]),
    country("Portugal", &["Lisbon", "Porto", "Faro", "Braga", "Coimbra"]),
    country("Spain", &["Madrid", "Barcelona", "Valencia", "Seville", "Málaga"]),
    country("Thailand", &["Bangkok", "Chiang Mai", "Phuket", "Pattaya"]),
    country("United Arab Emirates", &["Dubai", "Abu Dhabi", "Sharjah"]),
    country("United Kingdom", &["London", "Manchester", "Edinburgh", "Bristol", "Birmingham"]),
    country("United States", &["New York", "San Francisco", "Austin", "Seattle", "Miami", "Chicago"]),
];

/// Every destination, in display order.
pub fn countries() -> &'static [Country] {
    COUNTRIES
}

pub fn find_country(name: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.name == name)
}

/// A profile being filled in.
///
/// The city always belongs to the selected country: changing the country
/// clears it, and [`ProfileForm::set_city`] refuses foreign cities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    country: String,
    city: String,
    pub profession: String,
    pub age: String,
    pub lifestyle: Lifestyle,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Selects a country, clears the city, and returns the sorted cities to pick from.
    ///
    /// Unknown countries are kept as typed and offer no cities.
    pub fn set_country(&mut self, name: &str) -> Vec<&'static str> {
        self.country = name.to_string();
        self.city.clear();
        find_country(name)
            .map(Country::sorted_cities)
            .unwrap_or_default()
    }

    pub fn set_city(&mut self, city: &str) -> Result<(), EmiproError> {
        let belongs = find_country(&self.country).is_some_and(|c| c.has_city(city));
        if !belongs {
            let country = match self.country.as_str() {
                "" => "the selected country",
                name => name,
            };
            return Err(EmiproError::Validation(format!(
                "{city} is not a listed city in {country}"
            )));
        }
        self.city = city.to_string();
        Ok(())
    }

    /// Validates the draft and produces an immutable [`Profile`].
    pub fn submit(&self) -> Result<Profile, EmiproError> {
        let required = [
            ("Destination country", &self.country),
            ("Destination city", &self.city),
            ("Profession", &self.profession),
            ("Age", &self.age),
        ];
        if let Some((label, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(EmiproError::Validation(format!("{label} is required")));
        }

        let Some(country) = find_country(&self.country) else {
            return Err(EmiproError::Validation(format!(
                "{} is not a supported destination",
                self.country
            )));
        };
        if !country.has_city(&self.city) {
            return Err(EmiproError::Validation(format!(
                "{} is not a listed city in {}",
                self.city, country.name
            )));
        }

        let age = self.age.trim();
        match age.parse::<u8>() {
            Ok(1..=120) => {}
            _ => {
                return Err(EmiproError::Validation(format!(
                    "Age must be a whole number between 1 and 120, got `{age}`"
                )));
            }
        }

        Ok(Profile {
            destination_country: country.name.to_string(),
            destination_city: self.city.clone(),
            profession: self.profession.trim().to_string(),
            age: age.to_string(),
            lifestyle: self.lifestyle,
        })
    }
}
