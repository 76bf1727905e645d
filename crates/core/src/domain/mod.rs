pub mod consultation;
pub mod product;
pub mod recommendation;
