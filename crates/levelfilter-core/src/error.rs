use thiserror::Error;

use levelfilter_types::LogLevel;

/// Configuration problems reported by [`LevelFilterBuilder::try_build`](crate::LevelFilterBuilder::try_build)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("the level scale is empty")]
    EmptyLevels,
    #[error("level '{0}' appears more than once in the scale")]
    DuplicateLevel(LogLevel),
    #[error("minimum level '{0}' is not part of the level scale")]
    UnknownMinLevel(LogLevel),
}
