//! Neural network architecture
//!
//! A feed-forward classifier over the ten clinical features.

pub mod classifier_net;

pub use classifier_net::{ClassifierNet, ClassifierNetConfig};
