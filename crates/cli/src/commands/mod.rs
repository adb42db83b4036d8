pub mod graph;
pub mod plan;
pub mod reset;
pub mod run;
pub mod schema;
pub mod status;
