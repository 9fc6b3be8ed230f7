// Label prediction with pre-trained models: preprocessing, linear
// classifiers, and the bundle that holds them.

pub mod bundle;
pub mod model;
pub mod preprocess;
pub mod traits;
