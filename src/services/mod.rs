pub mod calendar;
pub mod handoff;
pub mod scheduling;
pub mod storage;
