pub mod cli;
pub mod ctx;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod scenario;
pub mod schema;
pub mod scores;
