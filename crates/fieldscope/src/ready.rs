//! One-shot readiness handshake with the renderer.
//!
//! The render view comes up asynchronously. Whoever creates it holds the
//! [`ReadySignal`] and hands the backend over exactly once; the viewer awaits the
//! matching [`ReadyFuture`] before issuing any scene work.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use fieldscope_core::{FieldscopeError, Result};
use futures::channel::oneshot::{channel, Receiver, Sender};
use futures::FutureExt as _;

/// Sending half: delivers the ready backend.
#[derive(Debug)]
pub struct ReadySignal<B> {
    sender: Sender<B>,
}

/// Receiving half: resolves to the backend, or [`FieldscopeError::NoRenderer`] if
/// the signal is dropped without firing.
#[derive(Debug)]
pub struct ReadyFuture<B> {
    receiver: Receiver<B>,
}

/// Creates a connected signal and future.
pub fn ready_channel<B>() -> (ReadySignal<B>, ReadyFuture<B>) {
    let (sender, receiver) = channel();
    (ReadySignal { sender }, ReadyFuture { receiver })
}

impl<B> ReadySignal<B> {
    /// Hands the backend to the waiting viewer. A viewer that went away is ignored.
    pub fn ready(self, backend: B) {
        if self.sender.send(backend).is_err() {
            log::debug!("render view became ready after its viewer was dropped");
        }
    }
}

impl<B> Future for ReadyFuture<B> {
    type Output = Result<B>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.receiver
            .poll_unpin(cx)
            .map(|r| r.map_err(|_| FieldscopeError::NoRenderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::FutureExt;

    #[test]
    fn test_ready_delivers_once() {
        let (signal, ready) = ready_channel::<u32>();
        signal.ready(7);
        assert_eq!(ready.block_on().unwrap(), 7);
    }

    #[test]
    fn test_dropped_signal_is_no_renderer() {
        let (signal, ready) = ready_channel::<u32>();
        drop(signal);
        assert!(matches!(ready.block_on(), Err(FieldscopeError::NoRenderer)));
    }
}
