/// ENS name parsing
///
/// Splits a fully-qualified ENS name into the user subdomain and the
/// business domain that owns it, e.g. "sarah.joescoffee.eth" ->
/// subdomain "sarah", business domain "joescoffee.eth".

/// A parsed ENS name.
///
/// `business_domain` always contains at least one `.` (the registrable
/// label plus the TLD). `subdomain` is empty for two-label names like
/// "test.eth"; the query then targets the business domain itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub subdomain: String,
    pub business_domain: String,
}

/// Parse an ENS name into `(subdomain, business_domain)`.
///
/// Returns `None` for names with fewer than two dot-separated labels.
/// No character-set validation or ENS normalization happens here; any
/// dotted string passes.
pub fn parse(name: &str) -> Option<ParsedName> {
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return None;
    }

    if labels.len() == 2 {
        return Some(ParsedName {
            subdomain: String::new(),
            business_domain: name.to_string(),
        });
    }

    Some(ParsedName {
        subdomain: labels[0].to_string(),
        business_domain: labels[1..].join("."),
    })
}
