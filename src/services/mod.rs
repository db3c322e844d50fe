pub mod token_exchange;
pub mod tracker;

pub use token_exchange::{TokenExchange, TokenExchangeError, TokenRequest};
pub use tracker::{ShowOverview, TrackerError, TrackerService};
