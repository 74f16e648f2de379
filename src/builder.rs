//! Route aggregation over a transaction corpus.
//!
//! Entries are grouped by origin (or by an explicit base-URL filter), then by
//! (method, path). Each bucket accumulates totals, per-parameter and
//! per-header occurrence stats, and merged body Nodes per content type and
//! per response status. Required-ness is never decided here; export compares
//! occurrence counts against the bucket total.
use indexmap::IndexMap;
use serde_json::Value;

use crate::har::{Entry, PostData, Response};
use crate::node::merge::merge_nodes;
use crate::node::{node_from_value, Node};

// ------------------------------- Buckets ---------------------------------- //

/// Aggregated corpus: group key (origin or base URL) → route key → bucket.
pub type ApiSpec = IndexMap<String, IndexMap<RouteKey, Route>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct Route {
    /// Transactions observed for this (method, path).
    pub total: u64,
    /// Query parameter name (case preserved) → occurrence stats.
    pub params: IndexMap<String, ParamStat>,
    /// Header name (lowercased) → occurrence stats.
    pub headers: IndexMap<String, ParamStat>,
    /// Request body content type → occurrence count + merged Node.
    pub body: IndexMap<String, BodyStat>,
    /// Response status → occurrence count, reason phrase, merged JSON body.
    pub responses: IndexMap<u16, ResponseStat>,
}

#[derive(Debug, Clone)]
pub struct ParamStat {
    pub requests: u64,
    /// First observed value, kept as documentation material.
    pub example: String,
}

#[derive(Debug, Clone, Default)]
pub struct BodyStat {
    pub requests: u64,
    /// Absent when no body of this content type ever parsed.
    pub node: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct ResponseStat {
    pub requests: u64,
    pub reason: String,
    pub body: Option<Node>,
}

// ------------------------------- Builder ---------------------------------- //

#[derive(Debug, Default)]
pub struct ApiSpecBuilder;

impl ApiSpecBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Fold a corpus of HAR entries into per-route buckets.
    ///
    /// With a `base_url` filter (trailing slash trimmed), entries whose URL
    /// does not start with it are discarded entirely; otherwise entries group
    /// by URL origin. Entries without a parseable origin are skipped.
    pub fn build_spec(&self, entries: &[Entry], base_url: Option<&str>) -> ApiSpec {
        let base_url = base_url.map(|url| url.trim_end_matches('/').to_string());

        let mut spec = ApiSpec::new();
        for entry in entries {
            let url = request_url(entry);
            let url = strip_query(url);

            let group = match &base_url {
                Some(base) => {
                    if !url.starts_with(base.as_str()) {
                        continue;
                    }
                    base.clone()
                }
                None => match origin_of(url) {
                    Some(origin) => origin.to_string(),
                    None => continue,
                },
            };

            let path = match &url[group.len()..] {
                "" => "/".to_string(),
                rest => rest.to_string(),
            };
            let key = RouteKey { method: entry.request.method.clone(), path };

            let route = spec
                .entry(group)
                .or_default()
                .entry(key)
                .or_default();
            Self::aggregate(route, entry);
        }
        spec
    }

    fn aggregate(route: &mut Route, entry: &Entry) {
        route.total += 1;

        for param in &entry.request.query_string {
            let stat = route
                .params
                .entry(param.name.clone())
                .or_insert_with(|| ParamStat { requests: 0, example: param.value.clone() });
            stat.requests += 1;
        }

        for header in &entry.request.headers {
            let stat = route
                .headers
                .entry(header.name.to_lowercase())
                .or_insert_with(|| ParamStat { requests: 0, example: header.value.clone() });
            stat.requests += 1;
        }

        if let Some(post_data) = &entry.request.post_data {
            Self::aggregate_request_body(route, post_data);
        }
        Self::aggregate_response(route, &entry.response);
    }

    fn aggregate_request_body(route: &mut Route, post_data: &PostData) {
        let essence = mime_essence(&post_data.mime_type);
        // Body aggregation is only attempted for the two structured content
        // types; everything else is left undocumented.
        let parsed: Option<Value> = match essence.as_str() {
            "application/json" => serde_json::from_str(&post_data.text).ok(),
            "application/x-www-form-urlencoded" => decode_form(&post_data.text),
            _ => return,
        };

        let stat = route.body.entry(essence).or_default();
        stat.requests += 1;
        // Bodies that fail to parse as declared still count the occurrence
        // but contribute nothing to the merged shape.
        if let Some(value) = parsed {
            merge_into(&mut stat.node, node_from_value(&value));
        }
    }

    fn aggregate_response(route: &mut Route, response: &Response) {
        let stat = route
            .responses
            .entry(response.status)
            .or_insert_with(|| ResponseStat {
                requests: 0,
                reason: response.status_text.clone(),
                body: None,
            });
        stat.requests += 1;

        if let Some(content) = &response.content {
            if mime_essence(&content.mime_type) == "application/json" {
                if let Some(value) = content
                    .text
                    .as_deref()
                    .and_then(|text| serde_json::from_str::<Value>(text).ok())
                {
                    merge_into(&mut stat.body, node_from_value(&value));
                }
            }
        }
    }
}

fn merge_into(slot: &mut Option<Node>, node: Node) {
    *slot = Some(match slot.take() {
        Some(acc) => merge_nodes(acc, node),
        None => node,
    });
}

// ------------------------------- URL bits --------------------------------- //

fn request_url(entry: &Entry) -> &str {
    entry
        .request
        .parameterized_url
        .as_deref()
        .unwrap_or(&entry.request.url)
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// scheme + host + port, e.g. `https://api.example.com:8080`.
fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find('/')
        .map(|i| authority_start + i)
        .unwrap_or(url.len());
    if authority_end == authority_start {
        return None;
    }
    Some(&url[..authority_end])
}

fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Decode an `application/x-www-form-urlencoded` body into a flat JSON
/// object; a repeated name collects its values into an array.
fn decode_form(text: &str) -> Option<Value> {
    let mut map = serde_json::Map::new();
    for pair in text.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = urlencoding::decode(&name.replace('+', " ")).ok()?.into_owned();
        let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
        match map.get_mut(&name) {
            None => {
                map.insert(name, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::Null);
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }
    Some(Value::Object(map))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Content, Param, Request};
    use serde_json::json;

    fn entry(method: &str, url: &str) -> Entry {
        Entry {
            request: Request {
                method: method.to_string(),
                url: url.to_string(),
                parameterized_url: None,
                query_string: Vec::new(),
                headers: Vec::new(),
                post_data: None,
            },
            response: Response {
                status: 200,
                status_text: "OK".to_string(),
                headers: Vec::new(),
                content: None,
            },
        }
    }

    fn with_query(mut e: Entry, pairs: &[(&str, &str)]) -> Entry {
        e.request.query_string = pairs
            .iter()
            .map(|(name, value)| Param { name: name.to_string(), value: value.to_string() })
            .collect();
        e
    }

    fn with_json_response(mut e: Entry, status: u16, reason: &str, text: &str) -> Entry {
        e.response.status = status;
        e.response.status_text = reason.to_string();
        e.response.content = Some(Content {
            mime_type: "application/json; charset=utf-8".to_string(),
            text: Some(text.to_string()),
        });
        e
    }

    fn route<'a>(spec: &'a ApiSpec, group: &str, method: &str, path: &str) -> &'a Route {
        &spec[group][&RouteKey { method: method.to_string(), path: path.to_string() }]
    }

    #[test]
    fn groups_by_origin_and_path() {
        let entries = vec![
            entry("GET", "https://a.test/users"),
            entry("GET", "https://a.test/users/1"),
            entry("GET", "https://b.test/users"),
        ];
        let spec = ApiSpecBuilder::new().build_spec(&entries, None);
        assert_eq!(spec.len(), 2);
        assert_eq!(spec["https://a.test"].len(), 2);
        assert_eq!(route(&spec, "https://a.test", "GET", "/users").total, 1);
        assert_eq!(route(&spec, "https://b.test", "GET", "/users").total, 1);
    }

    #[test]
    fn base_url_filter_discards_non_matching_entries() {
        let entries = vec![
            entry("GET", "https://a.test/api/users"),
            entry("GET", "https://a.test/other/users"),
        ];
        let spec = ApiSpecBuilder::new().build_spec(&entries, Some("https://a.test/api/"));
        assert_eq!(spec.len(), 1);
        let routes = &spec["https://a.test/api"];
        assert_eq!(routes.len(), 1);
        assert_eq!(route(&spec, "https://a.test/api", "GET", "/users").total, 1);
    }

    #[test]
    fn base_url_matching_no_entries_yields_empty_spec() {
        let entries = vec![entry("GET", "https://a.test/users")];
        let spec = ApiSpecBuilder::new().build_spec(&entries, Some("https://elsewhere.test"));
        assert!(spec.is_empty());
    }

    #[test]
    fn bare_origin_path_normalizes_to_slash() {
        let entries = vec![entry("GET", "https://a.test")];
        let spec = ApiSpecBuilder::new().build_spec(&entries, None);
        assert_eq!(route(&spec, "https://a.test", "GET", "/").total, 1);
    }

    #[test]
    fn parameterized_url_wins_over_raw_url() {
        let mut e = entry("GET", "https://a.test/users/42");
        e.request.parameterized_url = Some("https://a.test/users/{user_id}".to_string());
        let spec = ApiSpecBuilder::new().build_spec(&[e], None);
        assert_eq!(route(&spec, "https://a.test", "GET", "/users/{user_id}").total, 1);
    }

    #[test]
    fn query_params_count_per_occurrence_with_first_example() {
        // three GET /users?id=N and one without the param
        let entries = vec![
            with_query(entry("GET", "https://a.test/users?id=1"), &[("id", "1")]),
            with_query(entry("GET", "https://a.test/users?id=2"), &[("id", "2")]),
            with_query(entry("GET", "https://a.test/users?id=3"), &[("id", "3")]),
            entry("GET", "https://a.test/users"),
        ];
        let spec = ApiSpecBuilder::new().build_spec(&entries, None);
        let bucket = route(&spec, "https://a.test", "GET", "/users");
        assert_eq!(bucket.total, 4);
        let id = &bucket.params["id"];
        assert_eq!(id.requests, 3);
        assert_eq!(id.example, "1");
    }

    #[test]
    fn header_names_are_lowercased() {
        let mut e = entry("GET", "https://a.test/users");
        e.request.headers = vec![Param {
            name: "X-Request-Id".to_string(),
            value: "abc".to_string(),
        }];
        let spec = ApiSpecBuilder::new().build_spec(&[e], None);
        let bucket = route(&spec, "https://a.test", "GET", "/users");
        assert_eq!(bucket.headers["x-request-id"].requests, 1);
        assert_eq!(bucket.headers["x-request-id"].example, "abc");
    }

    #[test]
    fn json_request_bodies_merge_per_content_type() {
        let mut e1 = entry("POST", "https://a.test/users");
        e1.request.post_data = Some(PostData {
            mime_type: "application/json".to_string(),
            text: r#"{"name": "alice"}"#.to_string(),
        });
        let mut e2 = entry("POST", "https://a.test/users");
        e2.request.post_data = Some(PostData {
            mime_type: "application/json; charset=utf-8".to_string(),
            text: r#"{"name": "bob", "age": 33}"#.to_string(),
        });
        let spec = ApiSpecBuilder::new().build_spec(&[e1, e2], None);
        let bucket = route(&spec, "https://a.test", "POST", "/users");
        let body = &bucket.body["application/json"];
        assert_eq!(body.requests, 2);
        let Some(Node::Object { count, keys }) = &body.node else {
            panic!("expected merged object node");
        };
        assert_eq!(*count, 2);
        assert_eq!(keys["name"].count(), 2);
        assert_eq!(keys["age"].count(), 1);
    }

    #[test]
    fn form_bodies_decode_with_repeated_names_as_arrays() {
        let mut e = entry("POST", "https://a.test/search");
        e.request.post_data = Some(PostData {
            mime_type: "application/x-www-form-urlencoded".to_string(),
            text: "q=a+b&tag=x&tag=y%21".to_string(),
        });
        let spec = ApiSpecBuilder::new().build_spec(&[e], None);
        let bucket = route(&spec, "https://a.test", "POST", "/search");
        let body = &bucket.body["application/x-www-form-urlencoded"];
        assert_eq!(body.requests, 1);
        let expected = node_from_value(&json!({"q": "a b", "tag": ["x", "y!"]}));
        assert_eq!(body.node.as_ref().unwrap(), &expected);
    }

    #[test]
    fn undeclared_content_types_are_not_aggregated() {
        let mut e = entry("POST", "https://a.test/upload");
        e.request.post_data = Some(PostData {
            mime_type: "text/plain".to_string(),
            text: "hello".to_string(),
        });
        let spec = ApiSpecBuilder::new().build_spec(&[e], None);
        assert!(route(&spec, "https://a.test", "POST", "/upload").body.is_empty());
    }

    #[test]
    fn malformed_json_body_counts_but_adds_no_node() {
        let mut e = entry("POST", "https://a.test/users");
        e.request.post_data = Some(PostData {
            mime_type: "application/json".to_string(),
            text: "{not json".to_string(),
        });
        let spec = ApiSpecBuilder::new().build_spec(&[e], None);
        let bucket = route(&spec, "https://a.test", "POST", "/users");
        assert_eq!(bucket.total, 1);
        let body = &bucket.body["application/json"];
        assert_eq!(body.requests, 1);
        assert!(body.node.is_none());
    }

    #[test]
    fn responses_merge_json_bodies_per_status() {
        let entries = vec![
            with_json_response(entry("GET", "https://a.test/users"), 200, "OK", r#"[{"id": 1}]"#),
            with_json_response(entry("GET", "https://a.test/users"), 200, "OK", r#"[{"id": 2}]"#),
            with_json_response(entry("GET", "https://a.test/users"), 404, "Not Found", r#"{"error": "nope"}"#),
        ];
        let spec = ApiSpecBuilder::new().build_spec(&entries, None);
        let bucket = route(&spec, "https://a.test", "GET", "/users");
        assert_eq!(bucket.total, 3);

        let ok = &bucket.responses[&200];
        assert_eq!(ok.requests, 2);
        assert_eq!(ok.reason, "OK");
        assert_eq!(ok.body.as_ref().unwrap().count(), 2);

        let not_found = &bucket.responses[&404];
        assert_eq!(not_found.requests, 1);
        assert_eq!(not_found.reason, "Not Found");
    }

    #[test]
    fn unparsable_json_response_counts_but_adds_no_body() {
        let entries = vec![with_json_response(
            entry("GET", "https://a.test/users"),
            200,
            "OK",
            "<html>oops</html>",
        )];
        let spec = ApiSpecBuilder::new().build_spec(&entries, None);
        let bucket = route(&spec, "https://a.test", "GET", "/users");
        let ok = &bucket.responses[&200];
        assert_eq!(ok.requests, 1);
        assert!(ok.body.is_none());
    }
}
