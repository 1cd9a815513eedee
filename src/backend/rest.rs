use crate::{
    api::{
        client::{BindingQuery, ContributorService, ExperimentService, ResourceFilter},
        contributor::Binding,
        error::{Error, RequiredError, ResponseError},
        experiment::{Experiment, ResourceType},
        id::{ExperimentId, PageToken},
        list::{ListOptions, ListResponse, SortBy},
        URI_COMPONENT,
    },
    backend::transport::{HttpRequest, Method, Transport, UreqTransport},
    config::Configuration,
};
use anyhow::Context;
use percent_encoding::utf8_percent_encode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

/// Client for an API server.
///
/// Stateless apart from its configuration, so a single `Server` can be
/// shared between threads and used for concurrent calls.
pub struct Server<T = UreqTransport> {
    config: Configuration,
    transport: T,
}

impl Server {
    pub fn new(config: Configuration) -> Self {
        Server::with_transport(config, UreqTransport)
    }

    /// Shorthand for a server at `base_path` without authorization.
    pub fn for_url(base_path: &str) -> Self {
        Server::new(Configuration::new(base_path))
    }
}

impl<T: Transport> Server<T> {
    pub fn with_transport(config: Configuration, transport: T) -> Self {
        Server { config, transport }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the request for `endpoint` without sending it.
    pub fn request<Ep: Endpoint>(&self, endpoint: &Ep) -> Result<HttpRequest, Error> {
        build_request(endpoint, &self.config)
    }

    /// Sends `endpoint` once and decodes a 2xx body. Any other status is
    /// returned as [`Error::Response`] with the response untouched.
    pub fn execute<Ep: Endpoint>(&self, endpoint: &Ep) -> Result<Ep::Value, Error> {
        let request = self.request(endpoint)?;
        debug!(operation = Ep::NAME, method = %request.method, url = %request.url, "sending request");
        let response = self
            .transport
            .send(self.config.base_path(), &request)
            .map_err(Error::Transport)?;
        if !response.is_success() {
            warn!(operation = Ep::NAME, status = response.status, "request failed");
            return Err(ResponseError::new(response).into());
        }
        debug!(operation = Ep::NAME, status = response.status, "request succeeded");
        let parsed = read_response::<Ep::Response>(&response.body)
            .with_context(|| format!("deserializing {} response failed:\n{}", Ep::NAME, response.body))
            .map_err(Error::Deserialize)?;
        Ok(Ep::extract(parsed))
    }
}

/// Turns a typed call into a request descriptor. Fails before anything is
/// sent when a required parameter is missing.
pub fn build_request<Ep: Endpoint>(endpoint: &Ep, config: &Configuration) -> Result<HttpRequest, Error> {
    let mut url = render_path(endpoint)?;
    let body = endpoint.body()?;
    let query = endpoint
        .query()
        .context("serializing query parameters failed")
        .map_err(Error::Serialize)?;
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let mut headers = Vec::new();
    if let Some(token) = config.access_token() {
        headers.push(("authorization".to_owned(), format!("Bearer {}", token)));
    }
    if body.is_some() {
        headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
    }

    Ok(HttpRequest {
        method: Ep::METHOD,
        url,
        headers,
        body,
    })
}

fn render_path<Ep: Endpoint>(endpoint: &Ep) -> Result<String, RequiredError> {
    let mut path = String::with_capacity(Ep::PATH.len());
    let mut rest = Ep::PATH;
    while let Some(start) = rest.find('{') {
        let end = match rest[start..].find('}') {
            Some(offset) => start + offset,
            None => break,
        };
        let name = &rest[start + 1..end];
        let value = endpoint
            .path_param(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RequiredError::new(name, Ep::NAME))?;
        path.push_str(&rest[..start]);
        path.extend(utf8_percent_encode(value, URI_COMPONENT));
        rest = &rest[end + 1..];
    }
    path.push_str(rest);
    Ok(path)
}

fn read_response<R: DeserializeOwned>(body: &str) -> Result<R, serde_json::Error> {
    if body.trim().is_empty() {
        serde_json::from_str("{}")
    } else {
        serde_json::from_str(body)
    }
}

fn json_body<B: Serialize>(operation: &'static str, body: Option<&B>) -> Result<Option<String>, Error> {
    let body = body.ok_or_else(|| RequiredError::new("body", operation))?;
    let json = serde_json::to_string(body)
        .context("serializing request failed")
        .map_err(Error::Serialize)?;
    Ok(Some(json))
}

/// One API operation: method, path template and the shape of its answer.
///
/// Placeholders in `PATH` are written `{name}` and resolved through
/// [`Endpoint::path_param`].
pub trait Endpoint {
    const NAME: &'static str;
    const PATH: &'static str;
    const METHOD: Method;

    type Response: DeserializeOwned;
    type Value;

    fn path_param(&self, _name: &str) -> Option<&str> {
        None
    }

    fn query(&self) -> Result<String, serde_qs::Error> {
        Ok(String::new())
    }

    fn body(&self) -> Result<Option<String>, Error> {
        Ok(None)
    }

    fn extract(response: Self::Response) -> Self::Value;
}

/// An operation acknowledged with an empty body.
pub trait VoidEndpoint {
    const NAME: &'static str;
    const PATH: &'static str;
    const METHOD: Method;

    fn path_param(&self, _name: &str) -> Option<&str> {
        None
    }

    fn body(&self) -> Result<Option<String>, Error> {
        Ok(None)
    }
}

impl<E> Endpoint for E
where
    E: VoidEndpoint,
{
    const NAME: &'static str = <E as VoidEndpoint>::NAME;
    const PATH: &'static str = <E as VoidEndpoint>::PATH;
    const METHOD: Method = <E as VoidEndpoint>::METHOD;

    type Response = VoidResponse;
    type Value = ();

    fn path_param(&self, name: &str) -> Option<&str> {
        VoidEndpoint::path_param(self, name)
    }

    fn body(&self) -> Result<Option<String>, Error> {
        VoidEndpoint::body(self)
    }

    fn extract(_response: Self::Response) -> Self::Value {}
}

#[derive(Deserialize)]
pub struct VoidResponse {}

impl<T: Transport> ExperimentService for Server<T> {
    fn create_experiment(&self, experiment: &Experiment) -> Result<Experiment, Error> {
        self.execute(&CreateExperiment { body: Some(experiment) })
    }

    fn get_experiment(&self, id: &ExperimentId) -> Result<Experiment, Error> {
        self.execute(&GetExperiment { id: Some(id) })
    }

    fn list_experiments(&self, options: &ListOptions, resource: Option<&ResourceFilter>) -> Result<ListResponse<Experiment>, Error> {
        let request = ListExperiments {
            page_token: options.page_token.as_ref(),
            page_size: options.page_size,
            sort_by: options.sort_by.as_ref(),
            filter: options.filter.as_deref(),
            resource_type: resource.map(|r| r.resource_type),
            resource_id: resource.map(|r| r.id.as_str()),
        };
        self.execute(&request)
    }

    fn delete_experiment(&self, id: &ExperimentId) -> Result<(), Error> {
        self.execute(&DeleteExperiment { id: Some(id) })
    }
}

impl<T: Transport> ContributorService for Server<T> {
    fn list_bindings(&self, query: &BindingQuery) -> Result<Vec<Binding>, Error> {
        let request = ListBindings {
            namespace: query.namespace.as_deref(),
            user: query.user.as_deref(),
            role: query.role.as_deref(),
        };
        self.execute(&request)
    }

    fn add_contributor(&self, binding: &Binding) -> Result<(), Error> {
        self.execute(&CreateBinding { body: Some(binding) })
    }

    fn remove_contributor(&self, binding: &Binding) -> Result<(), Error> {
        self.execute(&DeleteBinding { body: Some(binding) })
    }
}

// EXPERIMENTS

#[derive(Debug, Clone, Copy)]
pub struct CreateExperiment<'a> {
    pub body: Option<&'a Experiment>,
}
impl Endpoint for CreateExperiment<'_> {
    const NAME: &'static str = "CreateExperiment";
    const PATH: &'static str = "/apis/v1beta1/experiments";
    const METHOD: Method = Method::Post;
    type Response = Experiment;
    type Value = Experiment;

    fn body(&self) -> Result<Option<String>, Error> {
        json_body(Self::NAME, self.body)
    }

    fn extract(response: Self::Response) -> Self::Value {
        response
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetExperiment<'a> {
    pub id: Option<&'a ExperimentId>,
}
impl Endpoint for GetExperiment<'_> {
    const NAME: &'static str = "GetExperiment";
    const PATH: &'static str = "/apis/v1beta1/experiments/{id}";
    const METHOD: Method = Method::Get;
    type Response = Experiment;
    type Value = Experiment;

    fn path_param(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.map(|id| id.as_ref()),
            _ => None,
        }
    }

    fn extract(response: Self::Response) -> Self::Value {
        response
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListExperiments<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a PageToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'a SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a str>,
    #[serde(rename = "resource_reference_key.type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    #[serde(rename = "resource_reference_key.id", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<&'a str>,
}
#[derive(Deserialize)]
pub struct ListExperimentsResponse {
    #[serde(default)]
    experiments: Vec<Experiment>,
    #[serde(default)]
    total_size: i32,
    #[serde(default)]
    next_page_token: PageToken,
}
impl Endpoint for ListExperiments<'_> {
    const NAME: &'static str = "ListExperiment";
    const PATH: &'static str = "/apis/v1beta1/experiments";
    const METHOD: Method = Method::Get;
    type Response = ListExperimentsResponse;
    type Value = ListResponse<Experiment>;

    fn query(&self) -> Result<String, serde_qs::Error> {
        serde_qs::to_string(self)
    }

    fn extract(response: Self::Response) -> Self::Value {
        ListResponse {
            items: response.experiments,
            total_size: response.total_size,
            next_page_token: response.next_page_token,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteExperiment<'a> {
    pub id: Option<&'a ExperimentId>,
}
impl VoidEndpoint for DeleteExperiment<'_> {
    const NAME: &'static str = "DeleteExperiment";
    const PATH: &'static str = "/apis/v1beta1/experiments/{id}";
    const METHOD: Method = Method::Delete;

    fn path_param(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.map(|id| id.as_ref()),
            _ => None,
        }
    }
}

// CONTRIBUTORS

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListBindings<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}
#[derive(Deserialize)]
pub struct ListBindingsResponse {
    #[serde(default)]
    bindings: Option<Vec<Binding>>,
}
impl Endpoint for ListBindings<'_> {
    const NAME: &'static str = "ListBindings";
    const PATH: &'static str = "/kfam/v1/bindings";
    const METHOD: Method = Method::Get;
    type Response = ListBindingsResponse;
    type Value = Vec<Binding>;

    fn query(&self) -> Result<String, serde_qs::Error> {
        serde_qs::to_string(self)
    }

    fn extract(response: Self::Response) -> Self::Value {
        response.bindings.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreateBinding<'a> {
    pub body: Option<&'a Binding>,
}
impl VoidEndpoint for CreateBinding<'_> {
    const NAME: &'static str = "CreateBinding";
    const PATH: &'static str = "/kfam/v1/bindings";
    const METHOD: Method = Method::Post;

    fn body(&self) -> Result<Option<String>, Error> {
        json_body(<Self as VoidEndpoint>::NAME, self.body)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteBinding<'a> {
    pub body: Option<&'a Binding>,
}
impl VoidEndpoint for DeleteBinding<'_> {
    const NAME: &'static str = "DeleteBinding";
    const PATH: &'static str = "/kfam/v1/bindings";
    const METHOD: Method = Method::Delete;

    fn body(&self) -> Result<Option<String>, Error> {
        json_body(<Self as VoidEndpoint>::NAME, self.body)
    }
}
