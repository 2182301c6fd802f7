pub mod choices;
pub mod criteria;
pub mod project;
pub mod scores;
pub mod session;
