pub mod product;

pub use product::{CreateInput, Product, UpdateInput};
