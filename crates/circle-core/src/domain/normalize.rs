//! Canonical forms for user-submitted profile values.

const SCHEMES: [&str; 3] = ["https://", "http://", "//"];

/// Normalize a link to an absolute `https://` URL.
///
/// Empty (or whitespace-only) input stays empty. Any `http`/`https`/
/// protocol-relative prefix is replaced by `https://`, the host is
/// lower-cased and a trailing slash on the path is dropped.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = strip_scheme(trimmed);

    let host_end = without_scheme
        .find(['/', '?', '#'])
        .unwrap_or(without_scheme.len());
    let (host, rest) = without_scheme.split_at(host_end);
    if host.is_empty() {
        return String::new();
    }

    let rest = if rest.contains(['?', '#']) {
        rest
    } else {
        rest.trim_end_matches('/')
    };

    format!("https://{}{}", host.to_ascii_lowercase(), rest)
}

fn strip_scheme(url: &str) -> &str {
    SCHEMES
        .iter()
        .find(|scheme| {
            url.get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
        .map_or(url, |scheme| &url[scheme.len()..])
}

/// Trim every skill and drop the empty ones, keeping submission order.
pub fn normalize_skills<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a comma-separated skill string into a normalized list.
pub fn split_skills(csv: &str) -> Vec<String> {
    normalize_skills(csv.split(','))
}
