use rill_dom::DomError;

/// Errors raised while bootstrapping an [`App`](crate::App).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// No element with the requested `id` is connected to the document.
    #[error("mount point `#{0}` was not found in the document")]
    RootNotFound(String),
    /// Rendering into the mount point failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}
