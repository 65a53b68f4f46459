pub mod conllu;
pub mod features;
pub mod magold;

pub use conllu::{FeatureMap, Sentence, Token};
pub use features::{AdjFeatures, Case, Gender, GrammNumber, NounFeatures, Rationality, State};
pub use magold::{FunctionalFeatures, MagoldLookup};
