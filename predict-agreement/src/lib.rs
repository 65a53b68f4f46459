pub mod evaluate;
pub mod pairs;
pub mod rules;
pub mod sync;
