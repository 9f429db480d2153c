pub mod gateways;
pub mod repositories;
pub mod text;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use doorlist_entities::{address::*, city::*, geo::*, unit::*};
}
