//! Status display trait

/// Errors that can occur with the status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed
    Bus,
}

/// Small monochrome display used for two-line status banners
///
/// Drawing happens in a frame buffer; nothing is visible until `flush`.
pub trait StatusDisplay {
    /// Blank the frame buffer
    fn clear(&mut self);

    /// Draw one line of text with its top-left corner at `(x, y)` pixels
    fn draw_line(&mut self, text: &str, x: i32, y: i32);

    /// Send the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}
