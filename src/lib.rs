//! # rest-resource - a generic REST resource client
//!
//! Point a [`ResourceClient`] at an endpoint template such as
//! `https://api.example.com/users/:userId/posts/:id` and it exposes one method
//! per verb: list, get, create, update, patch and delete. Each call resolves the
//! template against its parameters, sends the rest as the query string,
//! optionally renames keys between case conventions, runs any configured
//! customizers and normalizes the outcome into a [`Response`] or an [`ApiError`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use rest_resource::{CallParams, ResourceClient};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rest_resource::Error> {
//!     let posts = ResourceClient::builder("https://api.example.com/posts/:id")
//!         .response_case("camelCase")
//!         .build()?;
//!
//!     // GET /posts?tag=rust
//!     let all = posts.get_all(CallParams::new().with("tag", "rust"))?.await?;
//!     let all: Vec<Post> = all.json()?;
//!
//!     // PATCH /posts/1
//!     let patched = posts
//!         .patch(CallParams::new().with("id", 1), &json!({ "title": "Renamed" }))?
//!         .await?;
//!     let post: Post = patched.json()?;
//!     println!("{} posts, first renamed to {}", all.len(), post.title);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Two kinds of failure
//!
//! Precondition violations (no body for `create`, no `id` for `update` or
//! `delete`) are returned synchronously as [`Error::Argument`], before anything
//! is sent. Transport failures arrive through the pending handle, or the
//! callback, as an [`ApiError`] whose name and message can be pulled out of the
//! failure body with an [`ErrorFormatter`]:
//!
//! ```no_run
//! use rest_resource::{CallParams, ErrorFormatter, ResourceClient};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), rest_resource::Error> {
//! let users = ResourceClient::builder("https://api.example.com/users/:id")
//!     .error_formatter(ErrorFormatter::new().name("error.code").message("error.detail"))
//!     .build()?;
//!
//! // Argument fault: returned right here.
//! assert!(users.update(CallParams::new(), &json!({})).is_err());
//!
//! // API fault: delivered when the call completes.
//! match users.get(CallParams::new().with("id", 404))?.await {
//!     Ok(user) => println!("{}", user.data),
//!     Err(err) => eprintln!("{} {:?}: {}", err.name, err.status_code, err.message),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Callbacks
//!
//! Every pending handle can be awaited or given a callback with
//! [`Pending::on_complete`]. [`ResourceClient::invoke`] additionally accepts
//! loosely shaped positional arguments, resolved by [`CallShape::resolve`].

mod case;
mod client;
mod config;
mod customizer;
mod error;
mod metadata;
mod normalize;
mod pending;
mod response;
mod shape;
mod template;
pub mod transport;

pub use case::CaseConvention;
pub use client::{ClientBuilder, ResourceClient};
pub use config::{BodyOptions, Options, QueryOptions, RequestOptions, ResponseOptions};
pub use customizer::{Customizer, CustomizerError, Next};
pub use error::{ApiError, DefaultErrorFactory, Error, ErrorCode, ErrorFactory, RequestInfo, Result};
pub use metadata::{CallParams, RequestDescriptor, RequestType, REQUEST_CUSTOMIZER_KEY};
pub use normalize::{
    lookup_path, resolve_error_field, ErrorField, ErrorFormatter, CUSTOMIZER_ERROR_NAME,
    DEFAULT_ERROR_NAME,
};
pub use pending::Pending;
pub use response::Response;
pub use shape::{Arg, Callback, CallShape, Verb};
pub use template::EndpointTemplate;
