//! Client library for the experiment and contributor APIs of an ML
//! pipelines deployment.
//!
//! Every call goes through the same two steps: a typed [`Endpoint`] is
//! turned into an [`HttpRequest`] descriptor, then a [`Transport`] sends it
//! once and the answer is either decoded or handed back untouched.

pub mod api;
pub mod backend;
pub mod config;
pub mod pagination;

pub use api::client::{ContributorService, ExperimentService};
pub use api::error::Error;
pub use api::id::{ExperimentId, PageToken};
pub use backend::rest::{Endpoint, Server};
pub use backend::transport::{HttpRequest, RawResponse, Transport};
pub use config::Configuration;
