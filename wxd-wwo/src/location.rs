/// Build the provider query string for a city and state.
///
/// Lowercased, `city,state`, spaces replaced with `+`, e.g.
/// `("Providence", "Rhode Island")` becomes `providence,rhode+island`.
/// The result doubles as the location key stored with every row.
pub fn location_query(city: &str, state: &str) -> String {
    format!("{},{}", city.trim(), state.trim())
        .replace(' ', "+")
        .to_lowercase()
}
