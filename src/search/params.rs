//! Query-string rewriting for the search box
//!
//! Parameters keep their order. Setting a key replaces its first occurrence
//! in place and drops any later duplicates; a key not yet present is
//! appended. Spaces serialize as `+`.

use url::form_urlencoded;

type Pairs = Vec<(String, String)>;

fn parse(query: &str) -> Pairs {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

fn serialize(pairs: &Pairs) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

fn set(pairs: &mut Pairs, key: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = k != key || index == first;
                index += 1;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

fn remove(pairs: &mut Pairs, key: &str) {
    pairs.retain(|(k, _)| k != key);
}

/// First value of `key` in a query string
pub fn query_param(query: &str, key: &str) -> Option<String> {
    parse(query).into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Query string after the user searched for `value`
///
/// Pagination restarts at page 1. An empty search removes the `query`
/// parameter rather than leaving it empty. Other parameters are kept.
pub fn rewrite_query(current: &str, value: &str) -> String {
    let mut pairs = parse(current);
    set(&mut pairs, "page", "1");
    if value.is_empty() {
        remove(&mut pairs, "query");
    } else {
        set(&mut pairs, "query", value);
    }
    serialize(&pairs)
}
