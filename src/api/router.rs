use super::error::{error_response, method_not_allowed, route_not_found};
use super::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::libs::error::{AppError, AppResult, VALIDATION_INVALID_INPUT};
use crate::services::Services;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A request with the parameters captured from its route pattern.
pub struct RequestContext {
    pub request: HttpRequest,
    pub path_params: HashMap<String, String>,
}

impl RequestContext {
    /// Numeric path parameter, e.g. `{id}`.
    pub fn path_id(&self, name: &'static str) -> AppResult<i64> {
        let raw = self.path_param(name)?;
        raw.parse().map_err(|_| {
            AppError::validation(name, VALIDATION_INVALID_INPUT, format!("Path parameter '{}' must be a number, got '{}'", name, raw))
        })
    }

    pub fn path_param(&self, name: &'static str) -> AppResult<&str> {
        self.path_params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::Internal(format!("Route has no parameter '{}'", name)))
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.request.query_param(name).filter(|v| !v.is_empty())
    }

    /// Decodes the JSON body. An empty body decodes as the default value.
    pub fn body<T: DeserializeOwned + Default>(&self) -> AppResult<T> {
        if self.request.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&self.request.body)
            .map_err(|e| AppError::validation("body", VALIDATION_INVALID_INPUT, format!("Invalid JSON body: {}", e)))
    }
}

pub type Handler = Arc<dyn Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync>;

struct Route {
    method: HttpMethod,
    path_pattern: String,
    handler: Handler,
}

impl Route {
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        if self.path_pattern == path {
            return Some(HashMap::new());
        }

        let pattern_parts: Vec<&str> = self.path_pattern.split('/').collect();
        let path_parts: Vec<&str> = path.split('/').collect();
        if pattern_parts.len() != path_parts.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
            if pattern_part.starts_with('{') && pattern_part.ends_with('}') {
                let param_name = &pattern_part[1..pattern_part.len() - 1];
                let value = percent_decode_str(path_part).decode_utf8_lossy();
                params.insert(param_name.to_string(), value.into_owned());
            } else if pattern_part != path_part {
                return None;
            }
        }

        Some(params)
    }
}

/// Routes a parsed request to its handler and turns failures into the
/// error envelope.
#[derive(Clone)]
pub struct Router {
    routes: Arc<Vec<Route>>,
}

pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        RouterBuilder { routes: Vec::new() }
    }

    fn add<F>(&mut self, method: HttpMethod, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path_pattern: path.to_string(),
            handler: Arc::new(handler),
        });
    }

    pub fn get<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.add(HttpMethod::GET, path, handler);
    }

    pub fn post<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.add(HttpMethod::POST, path, handler);
    }

    pub fn put<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.add(HttpMethod::PUT, path, handler);
    }

    pub fn patch<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.add(HttpMethod::PATCH, path, handler);
    }

    pub fn delete<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Services, &RequestContext) -> AppResult<HttpResponse> + Send + Sync + 'static,
    {
        self.add(HttpMethod::DELETE, path, handler);
    }

    pub fn build(self) -> Router {
        Router {
            routes: Arc::new(self.routes),
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Blocking: handlers call straight into the services.
    pub fn handle(&self, services: &Services, request: HttpRequest) -> HttpResponse {
        if request.method == HttpMethod::OPTIONS {
            return HttpResponse::no_content().header("Access-Control-Max-Age", "86400");
        }

        let mut path_known = false;
        for route in self.routes.iter() {
            if let Some(path_params) = route.matches(&request.path) {
                if route.method != request.method {
                    path_known = true;
                    continue;
                }
                let ctx = RequestContext { request, path_params };
                return match (route.handler)(services, &ctx) {
                    Ok(response) => response,
                    Err(err) => error_response(&err),
                };
            }
        }

        let method = request.method.as_str();
        if path_known {
            return method_not_allowed(method, &request.path);
        }
        warn!(method, path = %request.path, "no route found");
        route_not_found(method, &request.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(pattern: &str) -> Route {
        Route {
            method: HttpMethod::GET,
            path_pattern: pattern.to_string(),
            handler: Arc::new(|_, _| Ok(HttpResponse::ok())),
        }
    }

    #[test]
    fn captures_path_parameters() {
        let params = route("/projects/{id}/sessions").matches("/projects/7/sessions").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("7"));

        assert!(route("/projects/{id}/sessions").matches("/projects/7").is_none());
        assert!(route("/projects/{id}").matches("/tasks/7").is_none());
        assert!(route("/tasks").matches("/tasks").unwrap().is_empty());
    }

    #[test]
    fn decodes_captured_segments() {
        let params = route("/categories/{name}").matches("/categories/Data%20Science").unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("Data Science"));

        let params = route("/categories/{name}").matches("/categories/Caf%C3%A9").unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("Café"));

        // An encoded slash stays inside its segment.
        let params = route("/notes/{key}/raw").matches("/notes/a%2Fb/raw").unwrap();
        assert_eq!(params.get("key").map(String::as_str), Some("a/b"));
    }
}
