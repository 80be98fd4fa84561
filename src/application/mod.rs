//! Application layer - orchestration over the ports.
//!
//! Help-desk features (ticket triage, chat replies, reports) talk only to
//! [`AiGateway`]; it decides whether the remote model is reachable and
//! degrades to the keyword classifier when it is not.

pub mod gateway;

pub use gateway::{
    AiGateway, BackoffRetrier, EndpointHealth, GatewaySettings, RemoteCallError, RetryPolicy,
    APOLOGY_MESSAGE,
};
