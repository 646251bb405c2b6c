mod outcome;

pub use outcome::RequestOutcome;
