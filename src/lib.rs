//! midoctl: command line client for the MidoNet extensions of the Neutron API
//!
//! Layers, innermost first:
//! - `domain`: resource kinds, request bodies, attribute parsing
//! - `application`: API client and command implementations
//! - `infrastructure`: HTTP transport and service container
//! - `cli`: argument parsing, dispatch and output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
