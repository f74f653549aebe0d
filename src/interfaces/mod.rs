//! Interface layer: REST API

pub mod http;
