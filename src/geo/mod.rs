//! GPS-to-pixel projection for the two map views.

pub mod project;
