//! HTTP API: REST glue between clients and the PharmaNet chaincode gateway.

pub mod app;
pub mod config;
