// Headlines and day keys
pub mod news;

// Per-day aggregates and market outcomes
pub mod summary;

// Trading-day resolution
pub mod trading_day;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
