#![warn(missing_docs)]
//! # Structured logging for the signer
//!
//! All crates in this workspace log through [tracing]. This crate installs
//! the subscriber that turns those spans and events into output.
//!
//! ## Filtering
//! Filtering follows `RUST_LOG`, e.g.
//! ```bash
//! RUST_LOG='we_keystore=debug,we_rust_utils[sign_zome_call]=trace' my_bin
//! ```
//! If `CUSTOM_FILTER` is set it replaces `RUST_LOG` entirely, and a parse
//! failure is reported rather than ignored.
//!
//! ## Output
//! The [Output] variant is passed into [init_fmt] on start up. It parses
//! from its name, so it can come straight from a command line flag or the
//! `log_output` key of a config file. [Output::Json] writes one json object
//! per event:
//! ```json
//! {"time":"2024-03-03T08:07:05.910Z","level":"INFO","target":"we_keystore","module_path":"we_keystore","file":"crates/we_keystore/src/lib.rs","line":71,"fields":{"message":"connected to keystore","endpoint":"local://keystore"},"spans":[]}
//! ```

use tracing_subscriber::{
    filter::EnvFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
    Registry,
};

use std::str::FromStr;

mod fmt;
use fmt::*;

pub use tracing;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
/// Sets the kind of structured logging output you want
pub enum Output {
    /// More compact version of [Output::Log]
    Compact,
    /// Outputs everything as json
    Json,
    /// Regular logging (default)
    #[default]
    Log,
    /// No logging to console
    None,
}

/// ParseError is a String
pub type ParseError = String;

impl FromStr for Output {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Json" => Ok(Output::Json),
            "Log" => Ok(Output::Log),
            "Compact" => Ok(Output::Compact),
            "None" => Ok(Output::None),
            _ => Err(format!("Could not parse log output type {s:?}")),
        }
    }
}

/// Run logging in a unit test.
///
/// RUST_LOG must be set or this is a no-op. Calling it from several tests
/// in one process is fine, only the first call installs a subscriber.
pub fn test_run() -> Result<(), errors::TracingError> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    match init_fmt(Output::Log) {
        Err(errors::TracingError::SetGlobal(_)) => Ok(()),
        res => res,
    }
}

/// Build the canonical filter based on env
pub fn standard_filter() -> Result<EnvFilter, errors::TracingError> {
    if std::env::var("CUSTOM_FILTER").is_ok() {
        return Ok(EnvFilter::try_from_env("CUSTOM_FILTER")?);
    }
    Ok(EnvFilter::from_default_env())
}

/// Return a layer directly, for times when you need more control over the
/// produced subscriber
pub fn standard_layer_unfiltered<W, S>(
    writer: W,
) -> tracing_subscriber::fmt::Layer<
    S,
    tracing_subscriber::fmt::format::DefaultFields,
    tracing_subscriber::fmt::format::Format,
    W,
>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    S: tracing::Subscriber
        + Send
        + Sync
        + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    tracing_subscriber::fmt::Layer::default()
        .with_writer(writer)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
}

/// This checks RUST_LOG for a filter but doesn't complain if there is none or it doesn't parse.
/// It then checks for CUSTOM_FILTER which if set will output an error if it doesn't parse.
pub fn init_fmt(output: Output) -> Result<(), errors::TracingError> {
    init_fmt_with_opts(output, std::io::stderr)
}

fn init_fmt_with_opts<W>(output: Output, writer: W) -> Result<(), errors::TracingError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = standard_filter()?;

    match output {
        Output::Json => Registry::default()
            .with(
                standard_layer_unfiltered(writer)
                    .event_format(FormatEvent)
                    .with_filter(filter),
            )
            .try_init()?,

        Output::Log => Registry::default()
            .with(standard_layer_unfiltered(writer).with_filter(filter))
            .try_init()?,

        Output::Compact => Registry::default()
            .with(
                standard_layer_unfiltered(writer)
                    .compact()
                    .with_filter(filter),
            )
            .try_init()?,

        Output::None => (),
    };
    Ok(())
}

pub mod errors {
    //! Error in the tracing/logging framework

    use thiserror::Error;

    /// Error in the tracing/logging framework
    #[allow(missing_docs)] // should be self-explanatory
    #[derive(Error, Debug)]
    pub enum TracingError {
        #[error(transparent)]
        SetGlobal(#[from] tracing_subscriber::util::TryInitError),
        #[error(transparent)]
        BadFilter(#[from] tracing_subscriber::filter::FromEnvError),
    }
}
