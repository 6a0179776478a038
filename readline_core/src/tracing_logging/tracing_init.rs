// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, rolling_file_appender_impl};
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(true)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

/// Install a global subscriber built from `tracing_config`. Does nothing for
/// [`crate::WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can't be opened, or a global subscriber is already
/// installed.
pub fn init(tracing_config: TracingConfig) -> miette::Result<()> {
    let Some(layers) = try_create_layers(&tracing_config)? else {
        return Ok(());
    };
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|error| miette::miette!("Could not initialize tracing: {error}"))
}

/// Build the layers without installing them, eg: to add more layers of your own.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_create_layers<S>(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<S>>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let writer_config = &tracing_config.writer_config;
    let display_preference = writer_config.display_preference();
    let file_path = writer_config.file_path();

    if display_preference.is_none() && file_path.is_none() {
        return Ok(None);
    }

    let mut layers: Vec<Box<DynLayer<S>>> = vec![];

    // Applies to every layer that follows, including ones added by the caller.
    layers.push(Box::new(tracing_config.level_filter));

    if let Some(display_preference) = display_preference {
        layers.push(match display_preference {
            DisplayPreference::Stdout => create_fmt!()
                .with_ansi(true)
                .with_writer(std::io::stdout)
                .boxed(),
            DisplayPreference::Stderr => create_fmt!()
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .boxed(),
        });
    }

    if let Some(file_path) = file_path {
        let file_appender = rolling_file_appender_impl::try_create(file_path)?;
        layers.push(
            create_fmt!()
                .with_ansi(false)
                .with_writer(file_appender)
                .boxed(),
        );
    }

    Ok(Some(layers))
}
