use std::sync::{Arc, LazyLock};

/// Deferred resolution of a view's content.
pub(crate) type Deferred<C> = Box<dyn FnOnce() -> C + Send>;

/// Memoized content shared by every clone of a view.
///
/// The initializer runs at most once, on first access; afterwards the content is immutable and
/// may be read by any number of traversals.
pub(crate) type ViewCell<C> = LazyLock<C, Deferred<C>>;

pub(crate) fn resolved<C: Send + 'static>(content: C) -> Arc<ViewCell<C>> {
    deferred(move || content)
}

pub(crate) fn deferred<C, F>(init: F) -> Arc<ViewCell<C>>
where
    F: FnOnce() -> C + Send + 'static,
{
    Arc::new(LazyLock::new(Box::new(init) as Deferred<C>))
}
