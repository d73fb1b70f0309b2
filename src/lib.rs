pub mod fetch;
pub mod members;
pub mod report;
pub mod tally;
