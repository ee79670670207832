//! Observable sequences built on unbounded tokio channels.
//!
//! A producer keeps an [`Emitter`] per subscriber and pushes snapshots into it.
//! The consumer side is an [`Observable`]: it yields every pushed value in order,
//! ends once all emitters are gone, and is cancelled by dropping it. A pushed
//! error is terminal by convention: producers stop emitting after [`Emitter::fail`].

use tokio::sync::mpsc;

use crate::errors::AppError;

/// Creates a connected emitter/observable pair.
pub fn channel<T>() -> (Emitter<T>, Observable<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Emitter { tx }, Observable { rx })
}

/// Producer half of an observable sequence.
#[derive(Debug)]
pub struct Emitter<T> {
    tx: mpsc::UnboundedSender<Result<T, AppError>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Emitter<T> {
    /// Pushes a value. Returns `false` once the subscriber has gone away.
    pub fn emit(&self, value: T) -> bool {
        self.tx.send(Ok(value)).is_ok()
    }

    /// Pushes a terminal error. Always returns `false`: the subscription is over.
    pub fn fail(&self, err: AppError) -> bool {
        let _ = self.tx.send(Err(err));
        false
    }

    /// Pushes the outcome of a query, returning whether the subscription is still live.
    pub fn deliver(&self, result: Result<T, AppError>) -> bool {
        match result {
            Ok(value) => self.emit(value),
            Err(err) => self.fail(err),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the subscriber has dropped its [`Observable`].
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Consumer half of an observable sequence.
#[derive(Debug)]
pub struct Observable<T> {
    rx: mpsc::UnboundedReceiver<Result<T, AppError>>,
}

impl<T> Observable<T> {
    /// A finite sequence that emits `values` and then completes.
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        let (emitter, observable) = channel();
        for value in values {
            emitter.emit(value);
        }
        observable
    }

    /// Waits for the next item. `None` means the sequence completed.
    ///
    /// Cancel safe: dropping the future loses no item.
    pub async fn next(&mut self) -> Option<Result<T, AppError>> {
        self.rx.recv().await
    }

    /// Waits for the first item, treating completion without a value as an error.
    pub async fn first(&mut self) -> Result<T, AppError> {
        match self.next().await {
            Some(item) => item,
            None => Err(AppError::Internal(
                "Sequence completed without emitting a value".to_string(),
            )),
        }
    }

    /// Returns an item only if one is already queued.
    pub fn try_next(&mut self) -> Option<Result<T, AppError>> {
        self.rx.try_recv().ok()
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Transforms every value with `f`. Errors pass through unchanged.
    ///
    /// Runs a forwarding task on the current tokio runtime. The task ends when
    /// either side goes away, which releases the upstream subscription.
    pub fn map<U, F>(mut self, mut f: F) -> Observable<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let (emitter, observable) = channel();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = emitter.closed() => break,
                    item = self.rx.recv() => {
                        let live = match item {
                            Some(Ok(value)) => emitter.emit(f(value)),
                            Some(Err(err)) => emitter.fail(err),
                            None => false,
                        };
                        if !live {
                            break;
                        }
                    }
                }
            }
        });
        observable
    }
}
