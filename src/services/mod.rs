pub mod discovery;
pub mod profile;
pub mod providers;
pub mod ranker;
pub mod recommender;
pub mod usage;
