use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::envelope::IntoData;
use crate::ApiError;

pub const SUCCESS_TITLE: &str = "Success";
pub const ERROR_TITLE: &str = "Error";

/// Where user-facing success and error notices go.
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _title: &str, _message: &str) {}
    fn error(&self, _title: &str, _message: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::info!(title, message, "notice");
    }

    fn error(&self, title: &str, message: &str) {
        tracing::warn!(title, message, "notice");
    }
}

pub struct RequestOptions<'a, T> {
    on_success: Option<Box<dyn FnOnce(&T) + 'a>>,
    on_error: Option<Box<dyn FnOnce(&ApiError) + 'a>>,
    success_message: Option<String>,
    error_message: Option<String>,
    skip_toast: bool,
}

impl<T> Default for RequestOptions<'_, T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
            success_message: None,
            error_message: None,
            skip_toast: false,
        }
    }
}

impl<'a, T> RequestOptions<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl FnOnce(&T) + 'a) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&ApiError) + 'a) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Replaces the error's own message in the notice.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn skip_toast(mut self) -> Self {
        self.skip_toast = true;
        self
    }
}

struct RequestState<T> {
    data: Option<T>,
    error: Option<Arc<ApiError>>,
    is_loading: bool,
}

/// Loading/error/result bookkeeping around one kind of request.
///
/// Overlapping calls are neither queued nor deduplicated: whichever resolves
/// last overwrites the stored state, regardless of issue order.
pub struct RequestTracker<T> {
    state: Mutex<RequestState<T>>,
    notifier: Arc<dyn Notifier>,
}

impl<T> RequestTracker<T> {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Mutex::new(RequestState {
                data: None,
                error: None,
                is_loading: false,
            }),
            notifier,
        }
    }

    pub fn silent() -> Self {
        Self::new(Arc::new(SilentNotifier))
    }

    fn state(&self) -> MutexGuard<'_, RequestState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<Arc<ApiError>> {
        self.state().error.clone()
    }

    pub fn reset(&self) {
        let mut state = self.state();
        state.data = None;
        state.error = None;
        state.is_loading = false;
    }
}

impl<T: Clone> RequestTracker<T> {
    pub fn data(&self) -> Option<T> {
        self.state().data.clone()
    }

    /// Runs `operation`, recording its outcome. Returns `None` on failure.
    pub async fn request<F, Fut, R>(&self, operation: F, options: RequestOptions<'_, T>) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
        R: IntoData<Data = T>,
    {
        {
            let mut state = self.state();
            state.is_loading = true;
            state.error = None;
        }

        let outcome = operation().await;
        let returned = match outcome {
            Ok(result) => {
                let data = result.into_data();
                self.state().data = Some(data.clone());
                if !options.skip_toast {
                    if let Some(message) = &options.success_message {
                        self.notifier.success(SUCCESS_TITLE, message);
                    }
                }
                if let Some(callback) = options.on_success {
                    callback(&data);
                }
                Some(data)
            }
            Err(error) => {
                let error = Arc::new(error);
                self.state().error = Some(Arc::clone(&error));
                if !options.skip_toast {
                    let message = options
                        .error_message
                        .clone()
                        .unwrap_or_else(|| error.to_string());
                    self.notifier.error(ERROR_TITLE, &message);
                }
                if let Some(callback) = options.on_error {
                    callback(&error);
                }
                None
            }
        };

        self.state().is_loading = false;
        returned
    }
}
