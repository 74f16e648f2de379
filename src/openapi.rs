//! OpenAPI 3.0 document assembly from aggregated route buckets.
use serde_json::{json, Map, Value};
use std::collections::HashSet;

use crate::builder::{ApiSpec, Route};
use crate::node::schema::to_json_schema;

/// Transport-standard request headers excluded from documented parameters.
pub const STANDARD_HEADERS: &[&str] = &[
    "host",
    "accept",
    "accept-encoding",
    "connection",
    "user-agent",
    "content-length",
    "content-type",
];

pub struct OpenApiSpecGenerator {
    standard_headers: HashSet<String>,
    include_constraints: bool,
}

impl Default for OpenApiSpecGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OpenApiSpecGenerator {
    pub fn new(include_constraints: bool) -> Self {
        Self::with_standard_headers(
            STANDARD_HEADERS.iter().map(|h| h.to_string()),
            include_constraints,
        )
    }

    pub fn with_standard_headers(
        standard_headers: impl IntoIterator<Item = String>,
        include_constraints: bool,
    ) -> Self {
        Self {
            standard_headers: standard_headers
                .into_iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            include_constraints,
        }
    }

    /// Assemble the OpenAPI mapping: `servers` lists every group key, `paths`
    /// collects one operation per (method, path) bucket. Serialization is the
    /// caller's concern.
    pub fn generate_spec(&self, api_spec: &ApiSpec) -> Value {
        let servers: Vec<Value> = api_spec.keys().map(|url| json!({ "url": url })).collect();

        let mut paths = Map::new();
        for routes in api_spec.values() {
            for (key, route) in routes {
                let method = key.method.to_lowercase();
                let operation = self.build_operation(&method, &key.path, route);
                paths
                    .entry(key.path.clone())
                    .or_insert_with(|| Value::Object(Map::new()))
                    .as_object_mut()
                    .expect("path item is always an object")
                    .insert(method, operation);
            }
        }

        json!({
            "openapi": "3.0.0",
            "info": { "title": "API", "version": "1.0.0" },
            "servers": servers,
            "paths": paths,
        })
    }

    fn build_operation(&self, method: &str, path: &str, route: &Route) -> Value {
        let mut operation = json!({
            "summary": format!("Endpoint for {} {path}", method.to_uppercase()),
            "operationId": operation_id(method, path),
            "parameters": self.build_parameters(route),
        });
        if let Some(request_body) = self.build_request_body(route) {
            operation["requestBody"] = request_body;
        }
        operation["responses"] = self.build_responses(route);
        operation
    }

    fn build_parameters(&self, route: &Route) -> Value {
        let mut parameters: Vec<Value> = Vec::new();
        for (name, stat) in &route.params {
            parameters.push(json!({
                "name": name,
                "in": "query",
                "required": stat.requests == route.total,
                "description": "",
                "schema": { "type": "string" },
            }));
        }
        for (name, stat) in &route.headers {
            if self.standard_headers.contains(name.as_str()) {
                continue;
            }
            parameters.push(json!({
                "name": name,
                "in": "header",
                "required": stat.requests == route.total,
                "description": "",
                "schema": { "type": "string" },
            }));
        }
        Value::Array(parameters)
    }

    fn build_request_body(&self, route: &Route) -> Option<Value> {
        if route.body.is_empty() {
            return None;
        }
        let observed: u64 = route.body.values().map(|stat| stat.requests).sum();

        let mut content = Map::new();
        for (mime_type, stat) in &route.body {
            let schema = match &stat.node {
                Some(node) => to_json_schema(node, self.include_constraints),
                None => json!({}),
            };
            content.insert(mime_type.clone(), json!({ "schema": schema }));
        }
        Some(json!({
            "required": observed == route.total,
            "content": content,
        }))
    }

    fn build_responses(&self, route: &Route) -> Value {
        let mut responses = Map::new();
        for (status, stat) in &route.responses {
            let mut response = json!({ "description": stat.reason });
            if let Some(node) = &stat.body {
                response["content"] = json!({
                    "application/json": {
                        "schema": to_json_schema(node, self.include_constraints),
                    },
                });
            }
            responses.insert(status.to_string(), response);
        }
        Value::Object(responses)
    }
}

/// Deterministic operation identifier: lowercased method plus the path with
/// separators and templating braces stripped, e.g.
/// `GET /users/{user_id}` → `get_users_user_id`.
fn operation_id(method: &str, path: &str) -> String {
    let flattened: String = path
        .chars()
        .map(|c| if c == '/' { '_' } else { c })
        .filter(|c| !matches!(c, '{' | '}'))
        .collect();
    format!("{}_{}", method, flattened.trim_matches('_'))
}

// ------------------------------- Tests ------------------------------------ //
