//! Cover display abstraction

/// Screen that shows one bitmap at a time.
///
/// Decoding and drawing are the driver's business; callers pass the path of
/// an on-disk bitmap.
pub trait CoverDisplay {
    /// Error type for display operations
    type Error: core::fmt::Debug;

    /// Replace the shown bitmap with `image`, or blank the screen on `None`.
    fn show(
        &mut self,
        image: Option<&str>,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
