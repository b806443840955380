use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A shared, one-way flag used to abandon background work.
///
/// The streaming manager hands a clone to every task it schedules for a chunk
/// and keeps one for itself. Cancelling any clone is visible to all of them.
/// Workers poll [`CancellationToken::is_cancelled`] between units of work and
/// bail out early; results that arrive for a cancelled token are discarded on
/// the orchestrating thread.
///
/// # Examples
/// ```
/// use voxel_terrain::core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker_view = token.clone();
/// token.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token and every clone of it as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once any clone has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
