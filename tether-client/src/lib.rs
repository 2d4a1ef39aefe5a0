#![doc = include_str!("../README.md")]

pub mod adapter;
pub mod builder;
pub mod client;
pub mod error;

pub use adapter::{BasicAuth, BearerAuth, NoAuth, RequestAdapter, StaticHost};
pub use builder::{ParamStyle, RequestBuilder};
pub use client::{ApiResponse, Client};
pub use error::{ApiError, BuildError};

// Re-export the HTTP method type endpoint code needs to build descriptors.
pub use reqwest::Method;
