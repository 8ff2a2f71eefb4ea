//! Request dispatch.
//!
//! Every request follows the same fixed sequence:
//!
//! ```text
//! match route → decode input → call handler → encode output
//!      ↓ no match          ↓ invalid            ↓ none
//!     404 / 405           400 / 422            404
//! ```
//!
//! Failures anywhere become an error envelope; they never escape
//! [`Service::call`].

use std::time::Instant;

use bytes::Bytes;
use http::{Request, Response};
use meridian_core::{
    Link, Links, MeridianError, MeridianResult, Operation, Page, PaginatedList, Record,
    RequestMetadata, Service, UrlContext,
};
use meridian_docs::{DocumentedOperation, SwaggerBuilder};
use meridian_router::Params;
use meridian_telemetry::metrics;
use serde_json::{json, Value};

use crate::app::{Action, Application, Input, RouteEntry};
use crate::response::{empty_response, error_response, json_response, method_not_allowed};

/// A matched request, ready for its handler.
struct Call<'a> {
    entry: &'a RouteEntry,
    params: Params,
    urls: UrlContext<'a>,
    request: &'a Request<Bytes>,
}

impl Service for Application {
    fn call(&self, request: Request<Bytes>) -> Response<Bytes> {
        let started = Instant::now();
        metrics::increment_in_flight();

        let metadata = RequestMetadata::from_headers(
            request.headers(),
            &self.config().route.url_root,
            &self.config().context.include_header_prefix,
        );
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let matched = self
            .router()
            .match_route(&method, &path)
            .map(|m| (m.endpoint.to_string(), m.params));

        let endpoint = matched
            .as_ref()
            .map_or_else(|| metrics::UNMATCHED_ENDPOINT.to_string(), |(e, _)| e.clone());
        let span = tracing::info_span!(
            "request",
            request_id = %metadata.request_id(),
            endpoint = %endpoint,
            method = %method,
            path = %path,
            context = ?metadata.context(),
        );
        let _guard = span.enter();

        let response = match matched {
            Some((_, params)) => self.dispatch(&endpoint, params, &request, &metadata),
            None => self.unmatched(&request),
        };

        let status = response.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "request rejected");
        } else {
            tracing::info!(status = status.as_u16(), "request completed");
        }

        metrics::record_request(&endpoint, method.as_str(), status.as_u16(), started.elapsed());
        metrics::decrement_in_flight();
        response
    }
}

impl Application {
    fn unmatched(&self, request: &Request<Bytes>) -> Response<Bytes> {
        match self.router().match_path(request.uri().path()) {
            Some((methods, _)) if methods.has_any_method() => {
                method_not_allowed(request.method(), &methods.allowed_methods())
            }
            _ => error_response(&MeridianError::route_not_found()),
        }
    }

    fn dispatch(
        &self,
        endpoint: &str,
        params: Params,
        request: &Request<Bytes>,
        metadata: &RequestMetadata,
    ) -> Response<Bytes> {
        let Some(entry) = self.entry(endpoint) else {
            return error_response(&MeridianError::internal(format!(
                "no route entry for endpoint '{endpoint}'"
            )));
        };
        let call = Call {
            entry,
            params,
            urls: self.url_context(metadata.url_root()),
            request,
        };
        match self.respond(&call) {
            Ok(response) => response,
            Err(err) => {
                if err.is_fatal() {
                    tracing::error!(error = %err, "handler failed");
                } else {
                    tracing::debug!(error = %err, "handler returned an error");
                }
                error_response(&err)
            }
        }
    }

    fn respond(&self, call: &Call<'_>) -> MeridianResult<Response<Bytes>> {
        let entry = call.entry;
        let input = decode_input(call)?;
        let status = entry.operation.default_code();

        match &entry.action {
            Action::Item { handler, require } => match handler(input)? {
                Some(item) => {
                    let body = encode_item(entry, &item, &call.urls)?;
                    Ok(json_response(status, &body))
                }
                None if *require => Err(not_found(entry)),
                None => Err(MeridianError::internal(format!(
                    "{} handler returned no item",
                    entry.operation
                ))),
            },
            Action::Search {
                handler,
                require_context,
            } => {
                let page = Page::from_record(&input, self.default_limit());
                let result = handler(input)?;
                if *require_context && result.context.is_none() {
                    return Err(MeridianError::internal(format!(
                        "{} handler must return a link context",
                        entry.operation
                    )));
                }
                let items = result
                    .items
                    .iter()
                    .map(|item| encode_item(entry, item, &call.urls))
                    .collect::<MeridianResult<Vec<_>>>()?;
                let list = PaginatedList::new(&entry.namespace, page, items, result.count)
                    .with_operation(entry.operation)
                    .with_context(result.context.unwrap_or_default());
                Ok(json_response(status, &list.to_value(&call.urls)?))
            }
            Action::Delete { handler } => {
                if handler(input)? {
                    Ok(empty_response(status))
                } else {
                    Err(not_found(entry))
                }
            }
            Action::Discovery { operations } => {
                let body = self.discover(call, operations)?;
                Ok(json_response(status, &body))
            }
            Action::Swagger { operations } => {
                let body = self.swagger(entry, operations)?;
                Ok(json_response(status, &body))
            }
        }
    }

    /// Links to every allow-listed operation; the page limit is taken from
    /// the query, the offset is always zero.
    fn discover(&self, call: &Call<'_>, operations: &[Operation]) -> MeridianResult<Value> {
        let urls = &call.urls;
        let requested = Page::from_query(&query_pairs(call.request)?, self.default_limit());
        let page = Page::new(0, requested.limit);

        let mut search = Vec::new();
        for route in self.routes().filter(|r| operations.contains(&r.operation)) {
            search.push(
                Link::to(route.operation, &route.namespace)
                    .link_type(route.namespace.subject_name())
                    .qs(page.to_query_pairs())
                    .allow_templates()
                    .resolve(urls)?,
            );
        }

        let mut links = Links::new();
        links.insert(
            "self",
            Link::to(Operation::Discover, &call.entry.namespace)
                .qs(page.to_query_pairs())
                .resolve(urls)?,
        );
        links.insert_many("search", search);
        Ok(json!({ "_links": links.to_value() }))
    }

    fn swagger(&self, entry: &RouteEntry, operations: &[Operation]) -> MeridianResult<Value> {
        let swagger = &self.config().swagger;
        let base_path = format!("{}{}", self.config().route.path_prefix, entry.namespace.path());

        let documented: Vec<DocumentedOperation> = self
            .routes()
            .filter(|r| operations.contains(&r.operation) && is_below(&r.template, &base_path))
            .map(documented_operation)
            .collect();

        let document = SwaggerBuilder::new(swagger.title.as_deref().unwrap_or(&swagger.name))
            .version(entry.namespace.effective_version())
            .base_path(base_path)
            .build(&documented)?;
        serde_json::to_value(&document).map_err(|err| {
            MeridianError::internal_with_source("could not serialise Swagger document", err)
        })
    }
}

/// True if `template` is `base` or a path beneath it.
fn is_below(template: &str, base: &str) -> bool {
    template
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn documented_operation(entry: &RouteEntry) -> DocumentedOperation {
    let mut documented =
        DocumentedOperation::new(entry.operation, entry.namespace.clone(), entry.template.clone());
    if let Some(schema) = entry.body_schema() {
        documented = documented.request_schema(schema.clone());
    }
    if let Some(schema) = entry.query_schema() {
        documented = documented.query_schema(schema.clone());
    }
    if let Some(schema) = &entry.response_schema {
        documented = documented.response_schema(schema.clone());
    }
    if let Some(description) = &entry.description {
        documented = documented.description(description.clone());
    }
    documented
}

fn not_found(entry: &RouteEntry) -> MeridianError {
    let name = match (entry.operation.is_relation(), entry.namespace.object_name()) {
        (true, Some(object)) => object,
        _ => entry.namespace.subject_name(),
    };
    MeridianError::not_found(format!("No such {name}"))
}

/// Path parameters first, then the decoded query or body.
fn decode_input(call: &Call<'_>) -> MeridianResult<Record> {
    let mut record: Record = call
        .params
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    let decoded = match &call.entry.input {
        Input::None => Record::new(),
        Input::Query(schema) => schema.decode_query(&query_pairs(call.request)?)?,
        Input::Body { schema, partial } => {
            let body = json_body(call.request)?;
            match schema {
                Some(schema) => schema.decode(&body, *partial)?,
                None => match body {
                    Value::Object(fields) => fields,
                    _ => return Err(MeridianError::bad_request("Request body must be a JSON object")),
                },
            }
        }
    };
    record.extend(decoded);
    Ok(record)
}

fn query_pairs(request: &Request<Bytes>) -> MeridianResult<Vec<(String, String)>> {
    serde_urlencoded::from_str(request.uri().query().unwrap_or_default())
        .map_err(|err| MeridianError::bad_request(format!("Malformed query string: {err}")))
}

/// An empty body reads as `{}`.
fn json_body(request: &Request<Bytes>) -> MeridianResult<Value> {
    let body = request.body();
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Record::new()));
    }
    serde_json::from_slice(body)
        .map_err(|err| MeridianError::bad_request(format!("Malformed JSON body: {err}")))
}

fn encode_item(entry: &RouteEntry, item: &Record, urls: &UrlContext<'_>) -> MeridianResult<Value> {
    match &entry.item_schema {
        Some(schema) => schema.encode(item, urls),
        None => Ok(Value::Object(item.clone())),
    }
}
