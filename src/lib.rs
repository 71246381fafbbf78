// Notification event model and validation
pub mod event;

// Broker connection, publisher, and error taxonomy
pub mod broker;

// Configuration
pub mod config;
