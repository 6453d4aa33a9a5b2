//! Ordinal debug verbosity levels shared by both binaries.
//!
//! The CLI exposes verbosity as a small integer (0-3). Values outside the
//! range are not an error; they fall back to [`Verbosity::ErrorsOnly`], which
//! is also the default.

use log::LevelFilter;

/// How much debugging output the application shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output at all.
    Silent,
    /// Errors only.
    ErrorsOnly,
    /// Errors and warnings.
    Warnings,
    /// Full status output, including per-sample details.
    StatusAll,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::ErrorsOnly
    }
}

impl Verbosity {
    /// Map an integer verbosity level from the command line to a `Verbosity`.
    ///
    /// 0 is silent, 1 errors only, 2 warnings, 3 full status. Any other value
    /// falls back to errors only.
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::ErrorsOnly,
            2 => Verbosity::Warnings,
            3 => Verbosity::StatusAll,
            _ => Verbosity::ErrorsOnly,
        }
    }

    /// The `log` filter corresponding to this verbosity.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Silent => LevelFilter::Off,
            Verbosity::ErrorsOnly => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::StatusAll => LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Verbosity;
    use log::LevelFilter;

    #[test]
    fn levels_map_to_the_four_ordinals() {
        assert_eq!(Verbosity::from_level(0), Verbosity::Silent);
        assert_eq!(Verbosity::from_level(1), Verbosity::ErrorsOnly);
        assert_eq!(Verbosity::from_level(2), Verbosity::Warnings);
        assert_eq!(Verbosity::from_level(3), Verbosity::StatusAll);
    }

    #[test]
    fn out_of_range_levels_fall_back_to_errors_only() {
        for level in [-1, 4, 7, 100, i64::MAX] {
            assert_eq!(Verbosity::from_level(level), Verbosity::ErrorsOnly);
        }
    }

    #[test]
    fn level_filters_follow_the_ordinals() {
        assert_eq!(Verbosity::Silent.level_filter(), LevelFilter::Off);
        assert_eq!(Verbosity::ErrorsOnly.level_filter(), LevelFilter::Error);
        assert_eq!(Verbosity::Warnings.level_filter(), LevelFilter::Warn);
        assert_eq!(Verbosity::StatusAll.level_filter(), LevelFilter::Debug);
    }
}
