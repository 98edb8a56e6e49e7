//! # rqa-client
//!
//! Remote invocation adapters for the Rebate QA harness. Each adapter
//! serializes a payload, performs one HTTP call, and returns the parsed
//! body unchanged. Transport and service failures are translated once, in
//! [`http`], into the closed error set of `rqa-core`; nothing here
//! retries, caches, or batches.

pub mod chatbot;
pub mod endpoint;
pub mod http;

pub use chatbot::{ChatbotClient, OPENAI_API_BASE};
pub use endpoint::ModelEndpointClient;
pub use http::HttpInvoker;
