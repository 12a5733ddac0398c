pub mod metric;
pub mod sprint;
pub mod ticket;
