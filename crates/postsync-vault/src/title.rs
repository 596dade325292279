//! The single capability the engine needs from whatever asks a human for
//! a post title.

/// Supplies a raw title string.
///
/// Console prompts, native dialogs and plain CLI arguments are all
/// adapters over this trait; the engine never knows which one it got.
pub trait TitleProvider {
    /// Ask for a title. `Ok(None)` means the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the input channel itself fails.
    fn title(&mut self) -> std::io::Result<Option<String>>;
}

/// A title that is already known, e.g. from a command-line argument.
#[derive(Debug, Clone)]
pub struct FixedTitle(pub String);

impl TitleProvider for FixedTitle {
    fn title(&mut self) -> std::io::Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}
