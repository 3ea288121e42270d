#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate bitflags;

pub mod errors;
pub mod headers;
pub mod values;
pub mod stream;
pub mod strhash;
pub mod intmap;
pub mod uels;
pub mod symbols;
pub mod data;
pub mod tables;
pub mod container;
