//! Global constants for the annotation engine

/// Smallest zoom scale a viewport accepts
pub const MIN_ZOOM: f64 = 0.1;

/// Default upper bound for the zoom scale
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;

/// Step, in source pixels, between a pasted region and its original
pub const PASTE_OFFSET: f64 = 10.0;

/// Size of the copy-rect template before anything has been drawn
pub const DEFAULT_TEMPLATE_WIDTH: f64 = 20.0;
pub const DEFAULT_TEMPLATE_HEIGHT: f64 = 20.0;

/// Number of digit hot keys that can address tags (1-9 and 0)
pub const MAX_TAG_HOTKEYS: usize = 10;
