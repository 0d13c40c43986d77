//! Screen regions of the editor UI.
//!
//! Each pane owns its slice of the viewport and whatever layout state
//! the next repaint needs: `relayout` pins the pane to a rectangle and
//! precomputes coordinates, `render` draws into the frame. The event
//! loop in [`crate::ui::app`] decides when either happens.
//!
//! - [`label`]: one-row text bands (headers, key help, the transient overlay)
//! - [`fields`]: the three preload field lines and the active-field marker
//! - [`grid`]: the column-major extension toggle grid

pub mod fields;
pub mod grid;
pub mod label;

pub use fields::FieldsPane;
pub use grid::GridPane;
pub use label::LabelPane;
