pub mod case;
pub mod outcome;
pub mod ports;
