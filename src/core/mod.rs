pub mod document;
pub mod markup;
pub mod persistence;

pub use crate::domain::ports::{ConfigProvider, Decoder, Encoder, Storage};
pub use crate::utils::error::Result;
