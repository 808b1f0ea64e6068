mod aggregate;
mod cache;
mod categories;
mod charts;
mod config;
pub mod derive;
mod figure;
pub mod manual;
mod menu;
mod table;

pub use crate::aggregate::*;
pub use crate::cache::*;
pub use crate::categories::*;
pub use crate::charts::*;
pub use crate::config::*;
pub use crate::figure::*;
pub use crate::menu::*;
pub use crate::table::*;
