// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::PinnedInputStream;
use async_stream::stream;
use std::time::Duration;

/// Yields each item of `generator_vec` in order, then ends. Use it to stand in for raw
/// `stdin` chunks in tests, eg: with [`crate::Readline::read_line_from_stream`].
pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}

/// Same as [`gen_input_stream`], sleeping for `delay` before each item.
pub fn gen_input_stream_with_delay<T>(
    generator_vec: Vec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            tokio::time::sleep(delay).await;
            yield item;
        }
    };
    Box::pin(it)
}
