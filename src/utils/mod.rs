pub mod csv;
pub mod math;
pub mod sort;
