#[macro_use]
extern crate log;

pub mod csv;
pub mod error;
mod import_csv;
mod lookup_cities;

pub mod prelude {
    pub use super::{
        csv::{detect_delimiter, HeaderAliases, RowReader},
        error::*,
        import_csv::*,
        lookup_cities::*,
    };
}

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use self::prelude::*;
pub(crate) use doorlist_core::entities::*;

#[cfg(test)]
mod tests;
