//! Adapters implementing the GPIO port.
//!
//! - `live`: the Linux GPIO character device.
//! - `simulated`: an in-memory bench with a scripted button.
//! - `recording` / `replaying`: cassette capture and playback around any controller.

pub mod live;
pub mod recording;
pub mod replaying;
pub mod simulated;
