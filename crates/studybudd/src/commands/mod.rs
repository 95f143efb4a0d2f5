pub mod calendar;
pub mod edit;
pub mod flashcards;
pub mod locate;
pub mod plan;
pub mod questions;
pub mod show;
pub mod sync;
