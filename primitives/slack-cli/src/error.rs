/// Flag combinations that can never be satisfied.
///
/// Detected before any prompt or network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("You can't set both --delete and --archive.")]
    DeleteAndArchive,

    #[error("You can't set both --exclude-archived and --only-archived.")]
    ExcludeAndOnlyArchived,
}
