// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ReadlineError;
use std::{future::Future,
          pin::Pin,
          task::{Context, Poll}};
use tokio::sync::oneshot::{self, error::TryRecvError};

pub type ReadLineResult = Result<String, ReadlineError>;

/// Resolves exactly once, with the submitted line or with the reason the read didn't
/// complete. Returned by [`crate::Readline::read`].
///
/// The future doesn't borrow the [`crate::Readline`], so the caller can keep feeding it
/// input with [`crate::Readline::handle_data`] while holding on to this.
#[derive(Debug)]
pub struct ReadLineFuture {
    receiver: oneshot::Receiver<ReadLineResult>,
}

impl ReadLineFuture {
    pub(crate) fn new() -> (oneshot::Sender<ReadLineResult>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver })
    }

    /// An already resolved future.
    pub(crate) fn resolved(result: ReadLineResult) -> Self {
        let (sender, it) = Self::new();
        // The receiver is alive, this can't fail.
        drop(sender.send(result));
        it
    }

    /// Non blocking check, for callers that don't run an async runtime. Returns `None`
    /// while the read is still pending.
    pub fn try_get_result(&mut self) -> Option<ReadLineResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ReadlineError::Aborted)),
        }
    }
}

impl Future for ReadLineFuture {
    type Output = ReadLineResult;

    /// A [`crate::Readline`] that is dropped with a read in flight counts as an abort.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or_else(|_| Err(ReadlineError::Aborted)))
    }
}
