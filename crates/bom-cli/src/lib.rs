//! Library components of the bill-of-materials uploader CLI.

pub mod logging;
pub mod prompt;
