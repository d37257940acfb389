// Process-facing infrastructure: terminal input, signals, instance lock
pub mod input;
pub mod instance;
pub mod signals;
