use std::error::Error;

/// The error type used by the command line tools and glue code, where the
/// precise error is only reported to the user.
pub type KbcError = Box<dyn Error>;
