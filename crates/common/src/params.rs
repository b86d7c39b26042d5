//! Diagnostic request parameters.
//!
//! Parameters can be supplied as alternating path segments after the route
//! prefix (`/ssl/json/delay/1000/statusCode/222`) or as query-string pairs
//! (`?delay=1000&statusCode=222`). Both sources are folded into one flat
//! [`ParamMap`]; a query parameter replaces a path parameter with the same key.

use std::collections::HashMap;
use std::time::Duration;

/// Parameter name holding the simulated delay in milliseconds.
pub const DELAY: &str = "delay";

/// Parameter name holding the requested response status code.
pub const STATUS_CODE: &str = "statusCode";

/// Flat parameter name → raw value mapping, scoped to one request.
pub type ParamMap = HashMap<String, String>;

/// Build the parameter map for one request.
///
/// `path_tail` is the request path after the route prefix. Its segments are
/// paired positionally (key, value, key, value, ...); an unpaired trailing
/// segment is dropped. `query` holds the decoded query pairs in request order;
/// only the first value of a repeated key is used, and it overrides any
/// path-derived entry.
pub fn extract(path_tail: &str, query: &[(String, String)]) -> ParamMap {
    let segments: Vec<&str> = path_tail.trim_matches('/').split('/').collect();

    let mut params: ParamMap = segments
        .chunks_exact(2)
        .map(|pair| (pair[0].to_owned(), pair[1].to_owned()))
        .collect();

    // Walking backwards leaves the first occurrence of each key in place.
    let mut first_query: ParamMap = HashMap::new();
    for (key, value) in query.iter().rev() {
        first_query.insert(key.clone(), value.clone());
    }
    params.extend(first_query);

    params
}

/// The simulated delay, if `delay` holds a non-negative integer.
pub fn delay(params: &ParamMap) -> Option<Duration> {
    params
        .get(DELAY)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// The requested status code, if `statusCode` holds an integer.
///
/// No range check happens here.
pub fn status_code(params: &ParamMap) -> Option<i64> {
    params.get(STATUS_CODE).and_then(|v| v.parse::<i64>().ok())
}
