pub mod error;
pub mod fetch;
pub mod reshape;
pub mod join;
pub mod aggregate;
pub mod series;
pub mod summary;
pub mod vaccine;
pub mod csse;
pub mod stats;
pub mod regress;
