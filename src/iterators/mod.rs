pub mod line;

pub use line::BresenhamLine;
