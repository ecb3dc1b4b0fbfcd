use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::location::location_query;

/// Embedded US city list backing the state and city selectors.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/uscities.csv");

/// A city entry from the city fixture.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct City {
    pub city: String,
    pub state_id: String,
    pub state_name: String,
}

impl City {
    /// Provider query / location key for this city.
    pub fn location_query(&self) -> String {
        location_query(&self.city, &self.state_name)
    }
}

/// State to city lookup used by the cascading selectors.
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    cities: Vec<City>,
}

impl CityDirectory {
    /// Parse a CSV string with columns: city, state_id, state_name.
    pub fn parse_city_csv(csv_object: &str) -> Result<CityDirectory, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        let mut cities = Vec::new();
        for row in rdr.records() {
            let record = row?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
            let city = City {
                city: field(0),
                state_id: field(1),
                state_name: field(2),
            };
            if city.city.is_empty() || city.state_name.is_empty() {
                continue;
            }
            cities.push(city);
        }
        Ok(CityDirectory { cities })
    }

    /// Directory built from the embedded fixture.
    pub fn embedded() -> Result<CityDirectory, csv::Error> {
        Self::parse_city_csv(CSV_OBJECT)
    }

    /// Sorted, de-duplicated state names.
    pub fn states(&self) -> Vec<String> {
        self.cities
            .iter()
            .map(|c| c.state_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cities of a state in fixture order. Unknown states yield an empty list.
    pub fn cities(&self, state_name: &str) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.state_name.eq_ignore_ascii_case(state_name))
            .collect()
    }

    /// The city preselected when a state is chosen.
    pub fn default_city(&self, state_name: &str) -> Option<&City> {
        self.cities(state_name).into_iter().next()
    }
}
