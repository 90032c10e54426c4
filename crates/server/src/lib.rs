pub mod routes;
pub mod startup;
pub mod state;
pub mod errors;

pub use startup::run;
pub use state::ServerState;
