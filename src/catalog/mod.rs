pub mod sparse;
pub mod store;

pub use sparse::{cosine, dot, CsrMatrix, SparseSlice, SparseVec};
pub use store::Catalog;
