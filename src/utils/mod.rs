pub mod distance;
pub mod distance_table;
pub mod readiness;
