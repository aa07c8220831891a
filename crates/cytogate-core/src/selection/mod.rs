pub mod classifier;
pub mod filter_store;
pub mod lasso;

pub use classifier::{build_request, Classification, ClassificationRequest, RayCastClassifier};
pub use filter_store::{intersect_filters, FilterIntersection, FilterSlot, FilterStore};
pub use lasso::{GestureEvent, LassoCapture, LassoPath, LassoState, PointerButton};
