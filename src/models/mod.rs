pub mod entry;
pub mod gross_salary;
pub mod period;
pub mod settings;
pub mod snapshot;
pub mod timer_state;
