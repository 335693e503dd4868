/// RGB to grayscale conversion
pub mod grayscale;
/// Linear rescaling of grayscale images
pub mod resize;
