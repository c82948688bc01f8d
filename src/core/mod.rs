pub mod clock;
pub mod net_pay;
pub mod notify;
pub mod observer;
pub mod pay;
pub mod period;
pub mod repository;
pub mod session;
pub mod session_store;
pub mod settings;
pub mod statistics;
pub mod timer;
