// Core modules implementing the menu model, codecs, and error modeling.
pub mod argument;
pub mod catalog;
pub mod deserialize;
pub mod error;
pub mod material;
pub mod model;
pub mod requirement;
pub mod serialize;
pub mod slots;
pub mod value;
