//! The resource client.
//!
//! The [`ResourceClient`] type is the main entry point. Use [`ClientBuilder`] to
//! configure case conversion, headers, customizers and error handling.

use crate::{
    config::{ClientConfig, Options},
    customizer::{Customizer, CustomizerError},
    error::{DefaultErrorFactory, ErrorFactory, RequestInfo},
    metadata::{build_query, check_form_body, CallParams, RequestDescriptor, RequestType},
    normalize::{self, ErrorFormatter},
    pending::Pending,
    shape::{Arg, CallShape, Verb},
    template::EndpointTemplate,
    transport::{ReqwestTransport, Transport, TransportConfig},
    ApiError, Error, Response, Result,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A client for one REST resource.
///
/// The client is built from an endpoint template such as
/// `https://api.example.com/users/:userId/posts/:id` and exposes one method per
/// verb. It is cheap to clone; clones share configuration and connections.
///
/// # Examples
///
/// ```no_run
/// use rest_resource::{CallParams, ResourceClient};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), rest_resource::Error> {
/// let posts = ResourceClient::builder("https://api.example.com/users/:userId/posts/:id")
///     .query_case("snakeCase")
///     .response_case("camelCase")
///     .build()?;
///
/// // GET /users/7/posts?page_size=20
/// let page = posts
///     .get_all(CallParams::new().with("userId", 7).with("pageSize", 20))?
///     .await?;
/// println!("{}", page.data);
///
/// // POST /users/7/posts
/// let created = posts
///     .create(CallParams::new().with("userId", 7), &json!({ "title": "Hello" }))?
///     .await?;
/// println!("{}", created.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResourceClient {
    inner: Arc<ClientConfig>,
}

impl ResourceClient {
    /// Creates a client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `template` is empty and
    /// [`Error::InvalidUrl`] if it is not an absolute URL.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        Self::builder(template).build()
    }

    /// Creates a [`ClientBuilder`] for the given endpoint template.
    pub fn builder(template: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(template)
    }

    /// The endpoint template this client was built with.
    pub fn template(&self) -> &EndpointTemplate {
        &self.inner.template
    }

    /// Lists the collection with a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error only if the resolved URL cannot be parsed.
    pub fn get_all(&self, params: CallParams) -> Result<Pending> {
        self.dispatch(Verb::GetAll, CallShape::new(params, None))
    }

    /// Fetches a resource with a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error only if the resolved URL cannot be parsed.
    pub fn get(&self, params: CallParams) -> Result<Pending> {
        self.dispatch(Verb::Get, CallShape::new(params, None))
    }

    /// Creates a resource with a POST request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `data` is not an object, array or string,
    /// and [`Error::SerializationFailed`] if it cannot be serialized.
    pub fn create<D>(&self, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.with_data(Verb::Create, params, data)
    }

    /// Alias for [`create`](Self::create).
    pub fn post<D>(&self, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.create(params, data)
    }

    /// Replaces a resource with a PUT request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `params` has no `id` or `data` is not an
    /// object, array or string.
    pub fn update<D>(&self, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.with_data(Verb::Update, params, data)
    }

    /// Alias for [`update`](Self::update).
    pub fn put<D>(&self, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.update(params, data)
    }

    /// Partially updates a resource with a PATCH request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `data` is not an object, array or string.
    pub fn patch<D>(&self, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.with_data(Verb::Patch, params, data)
    }

    /// Deletes a resource with a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `params` has no `id`.
    pub fn delete(&self, params: CallParams) -> Result<Pending> {
        self.dispatch(Verb::Delete, CallShape::new(params, None))
    }

    /// Deletes a resource with a DELETE request carrying a body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `params` has no `id` or `body` is not an
    /// object, array or string.
    pub fn delete_with_body<D>(&self, params: CallParams, body: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        self.with_data(Verb::Delete, params, body)
    }

    /// Invokes `verb` with positional arguments.
    ///
    /// The arguments are resolved by [`CallShape::resolve`]. When the last
    /// argument is a callback, the call runs in the background, the callback
    /// receives the outcome and `Ok(None)` is returned. Otherwise the pending
    /// handle is returned.
    ///
    /// # Errors
    ///
    /// Argument faults are returned here, before anything is sent, and never
    /// reach the callback.
    ///
    /// A callback given outside a Tokio runtime is a
    /// [`Error::ConfigurationError`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rest_resource::{Arg, ResourceClient, Verb};
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), rest_resource::Error> {
    /// let client = ResourceClient::new("https://api.example.com/users/:id")?;
    ///
    /// // create(data)
    /// let pending = client.invoke(Verb::Create, vec![json!({ "name": "x" }).into()])?;
    /// let created = pending.expect("no callback was given").await?;
    ///
    /// // delete(params, callback)
    /// client.invoke(
    ///     Verb::Delete,
    ///     vec![
    ///         json!({ "id": created.data["id"] }).into(),
    ///         Arg::callback(|result| println!("deleted: {}", result.is_ok())),
    ///     ],
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn invoke(&self, verb: Verb, args: Vec<Arg>) -> Result<Option<Pending>> {
        let mut shape = CallShape::resolve(verb, args)?;
        let callback = shape.callback.take();
        let pending = self.dispatch(verb, shape)?;

        match callback {
            Some(callback) => {
                pending.on_complete(callback)?;
                Ok(None)
            }
            None => Ok(Some(pending)),
        }
    }

    fn with_data<D>(&self, verb: Verb, params: CallParams, data: &D) -> Result<Pending>
    where
        D: Serialize + ?Sized,
    {
        let data =
            serde_json::to_value(data).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.dispatch(verb, CallShape::new(params, Some(data)))
    }

    /// Validates the shape, assembles the request and returns the pending call.
    fn dispatch(&self, verb: Verb, shape: CallShape) -> Result<Pending> {
        shape.validate(verb)?;

        let config = &self.inner;
        let CallShape { params, data, .. } = shape;
        let (supplied, call_customizer) = params.into_parts();

        // Placeholders are consumed from a copy; customizers see the params as supplied.
        let mut remaining = supplied.clone();
        let url = Url::parse(&config.template.build_url(&mut remaining))?;
        let query = build_query(&remaining, config.query_case, config.repeat_params);

        let body = match (data, config.request_body_case) {
            (Some(body), Some(case)) => Some(case.convert_value(body)),
            (body, _) => body,
        };
        if let (RequestType::Form, Some(body)) = (config.request_type, &body) {
            check_form_body(body)?;
        }

        let request = RequestDescriptor {
            method: verb.method(),
            url,
            query,
            body,
            request_type: config.request_type,
            headers: config.headers.clone(),
        };

        let config = Arc::clone(&self.inner);
        Ok(Pending::new(async move {
            config.execute(request, supplied, call_customizer).await
        }))
    }
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("template", &self.inner.template)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Runs the customizers, submits the request and normalizes the outcome.
    async fn execute(
        &self,
        request: RequestDescriptor,
        params: Map<String, Value>,
        call_customizer: Option<Customizer>,
    ) -> std::result::Result<Response, ApiError> {
        let request_info = RequestInfo {
            method: request.method.clone(),
            url: request.url.to_string(),
        };

        let request = match self.customize(request, &params, call_customizer).await {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %request_info.method,
                    url = %request_info.url,
                    "Request customizer aborted the call"
                );
                return Err(normalize::customizer_failure(
                    e,
                    self.error_factory.as_ref(),
                    request_info,
                ));
            }
        };

        let request_info = RequestInfo {
            method: request.method.clone(),
            url: request.url.to_string(),
        };

        tracing::debug!(
            method = %request_info.method,
            url = %request_info.url,
            query_pairs = request.query.len(),
            has_body = request.body.is_some(),
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let outcome = self.transport.send(request).await;
        let latency = start_time.elapsed();

        match outcome {
            Ok(response) => {
                tracing::info!(
                    status = response.status.as_u16(),
                    latency_ms = latency.as_millis(),
                    "Received HTTP response"
                );
                Ok(normalize::normalize_success(
                    response,
                    self.response_body_case,
                    latency,
                ))
            }
            Err(e) => {
                let error = normalize::normalize_failure(
                    e,
                    &self.error_formatter,
                    self.error_factory.as_ref(),
                    request_info,
                );
                tracing::warn!(
                    error = %error,
                    status = ?error.status_code,
                    method = %error.request_info.method,
                    url = %error.request_info.url,
                    latency_ms = latency.as_millis(),
                    "Request failed"
                );
                Err(error)
            }
        }
    }

    /// Applies the client-level customizer, then the per-call one.
    async fn customize(
        &self,
        mut request: RequestDescriptor,
        params: &Map<String, Value>,
        call_customizer: Option<Customizer>,
    ) -> std::result::Result<RequestDescriptor, CustomizerError> {
        for customizer in self.customizer.iter().chain(call_customizer.iter()) {
            request = customizer.apply(request, params).await?;
        }
        Ok(request)
    }
}

/// Builder for configuring and creating a [`ResourceClient`].
///
/// # Examples
///
/// ```no_run
/// use rest_resource::{ClientBuilder, Customizer, ErrorFormatter};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), rest_resource::Error> {
/// let client = ClientBuilder::new("https://api.example.com/users/:id")
///     .query_case("snakeCase")
///     .body_case("snakeCase")
///     .response_case("camelCase")
///     .repeat_params(false)
///     .header("User-Agent", "my-app/1.0")
///     .keep_alive(true)
///     .timeout(Duration::from_secs(30))
///     .customizer(Customizer::sync(|request, _params| {
///         request.push_query("api_key", "secret");
///     }))
///     .error_formatter(ErrorFormatter::new().name("error.type").message("error.message"))
///     .build()?;
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    template: String,
    options: Options,
    customizer: Option<Customizer>,
    error_formatter: ErrorFormatter,
    error_factory: Option<Arc<dyn ErrorFactory>>,
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default options.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            options: Options::default(),
            customizer: None,
            error_formatter: ErrorFormatter::default(),
            error_factory: None,
            transport: None,
            timeout: None,
        }
    }

    /// Replaces all plain-data options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the case conversion applied to query keys.
    pub fn query_case(mut self, name: impl Into<String>) -> Self {
        self.options.query.convert_case = Some(name.into());
        self
    }

    /// Sets whether arrays are sent as repeated query keys (default) or joined with commas.
    pub fn repeat_params(mut self, repeat: bool) -> Self {
        self.options.query.repeat_params = repeat;
        self
    }

    /// Sets the case conversion applied to top-level request body keys.
    pub fn body_case(mut self, name: impl Into<String>) -> Self {
        self.options.request.body.convert_case = Some(name.into());
        self
    }

    /// Sets the case conversion applied to top-level response body keys.
    pub fn response_case(mut self, name: impl Into<String>) -> Self {
        self.options.response.body.convert_case = Some(name.into());
        self
    }

    /// Sets the body encoding.
    pub fn request_type(mut self, request_type: RequestType) -> Self {
        self.options.request.request_type = request_type;
        self
    }

    /// Adds a header sent with every request. Validated by [`build`](Self::build).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    /// Routes every request through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.options.proxy = Some(url.into());
        self
    }

    /// Keeps connections alive between calls.
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.options.keep_alive = keep_alive;
        self
    }

    /// Sets the per-request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the customizer run before every request of this client.
    pub fn customizer(mut self, customizer: Customizer) -> Self {
        self.customizer = Some(customizer);
        self
    }

    /// Sets the rules for extracting error names and messages.
    pub fn error_formatter(mut self, formatter: ErrorFormatter) -> Self {
        self.error_formatter = formatter;
        self
    }

    /// Replaces the default error constructor.
    pub fn error_factory(mut self, factory: impl ErrorFactory + 'static) -> Self {
        self.error_factory = Some(Arc::new(factory));
        self
    }

    /// Uses `transport` instead of the default reqwest-backed one.
    ///
    /// Proxy, keep-alive and timeout settings only apply to the default transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the configured `ResourceClient`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] for an empty template, [`Error::InvalidUrl`]
    /// for a template that is not an absolute URL, and
    /// [`Error::ConfigurationError`] for an unknown case name, an invalid header
    /// or an invalid proxy.
    pub fn build(self) -> Result<ResourceClient> {
        let template = EndpointTemplate::parse(&self.template)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let proxy = self
                    .options
                    .proxy
                    .as_deref()
                    .map(Url::parse)
                    .transpose()
                    .map_err(|e| Error::ConfigurationError(format!("Invalid proxy: {}", e)))?;
                let transport_config = TransportConfig {
                    proxy,
                    keep_alive: self.options.keep_alive,
                    timeout: self.timeout,
                };
                Arc::new(ReqwestTransport::new(&transport_config)?) as Arc<dyn Transport>
            }
        };

        let error_factory = self
            .error_factory
            .unwrap_or_else(|| Arc::new(DefaultErrorFactory));

        let config = ClientConfig::resolve(
            template,
            &self.options,
            self.customizer,
            self.error_formatter,
            error_factory,
            transport,
        )?;

        Ok(ResourceClient {
            inner: Arc::new(config),
        })
    }
}
