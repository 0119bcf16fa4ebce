//! Clock abstraction used to pace streamed output.
//!
//! The streamer only needs to wait between lines and measure elapsed time.
//! Native builds wait on tokio, browser builds on `setTimeout`, and tests use
//! [`InstantTimer`], which never blocks and advances a virtual clock instead.

use std::cell::Cell;
use std::future::Future;

pub trait Timer {
    /// Wait for `ms` milliseconds.
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;

    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Timer that resolves immediately and accumulates the requested delays.
#[derive(Debug, Default)]
pub struct InstantTimer {
    elapsed: Cell<f64>,
}

impl InstantTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for InstantTimer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        self.elapsed.set(self.elapsed.get() + f64::from(ms));
        std::future::ready(())
    }

    fn now_ms(&self) -> f64 {
        self.elapsed.get()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use super::Timer;

    /// Timer backed by the tokio runtime.
    #[derive(Debug)]
    pub struct TokioTimer {
        origin: Instant,
    }

    impl TokioTimer {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
            }
        }
    }

    impl Default for TokioTimer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Timer for TokioTimer {
        async fn sleep(&self, ms: u32) {
            tokio::time::sleep(Duration::from_millis(u64::from(ms))).await;
        }

        fn now_ms(&self) -> f64 {
            self.origin.elapsed().as_secs_f64() * 1000.0
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::TokioTimer;

#[cfg(target_arch = "wasm32")]
mod browser {
    use gloo_timers::future::TimeoutFuture;

    use super::Timer;

    /// Timer backed by `setTimeout` and `Date.now()`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserTimer;

    impl Timer for BrowserTimer {
        async fn sleep(&self, ms: u32) {
            TimeoutFuture::new(ms).await;
        }

        fn now_ms(&self) -> f64 {
            js_sys::Date::now()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTimer;
