//! Presentational components.
//!
//! Components are pure functions from props to an element tree; the tree can
//! be inspected directly or serialised with [`loading::Element::to_html`].

pub mod loading;

pub use loading::{Dimension, Element, LoadingProps, Node, render};
