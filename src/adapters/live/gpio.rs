//! Live GPIO adapter backed by the Linux GPIO character device.

use std::path::Path;

use crate::ports::gpio::{GpioChip, GpioController, GpioError, GpioLine, InputLine, Level, OutputLine};

/// Live controller that opens `/dev/gpiochipN` devices through `gpio-cdev`.
pub struct LiveGpioController;

#[cfg(target_os = "linux")]
mod cdev {
    use gpio_cdev::{Chip, Line, LineHandle, LineRequestFlags};

    use super::{GpioChip, GpioError, GpioLine, InputLine, Level, OutputLine};

    pub(super) struct CdevChip(pub(super) Chip);

    impl GpioChip for CdevChip {
        fn get_line(&mut self, offset: u32) -> Result<Box<dyn GpioLine>, GpioError> {
            let line = self.0.get_line(offset).map_err(|err| {
                log::debug!("get_line({offset}) failed: {err}");
                GpioError::NoSuchLine(offset)
            })?;
            Ok(Box::new(CdevLine(line)))
        }
    }

    struct CdevLine(Line);

    impl CdevLine {
        fn request(
            &self,
            flags: LineRequestFlags,
            consumer: &str,
            initial: Level,
        ) -> Result<LineHandle, GpioError> {
            let offset = self.0.offset();
            self.0.request(flags, initial.as_raw(), consumer).map_err(|err| {
                log::debug!("request of line {offset} failed: {err}");
                GpioError::RequestRejected(offset)
            })
        }
    }

    impl GpioLine for CdevLine {
        fn offset(&self) -> u32 {
            self.0.offset()
        }

        fn request_input(self: Box<Self>, consumer: &str) -> Result<Box<dyn InputLine>, GpioError> {
            let handle = self.request(LineRequestFlags::INPUT, consumer, Level::Low)?;
            Ok(Box::new(CdevHandle(handle)))
        }

        fn request_output(
            self: Box<Self>,
            consumer: &str,
            initial: Level,
        ) -> Result<Box<dyn OutputLine>, GpioError> {
            let handle = self.request(LineRequestFlags::OUTPUT, consumer, initial)?;
            Ok(Box::new(CdevHandle(handle)))
        }
    }

    /// A requested line. The kernel releases it when the handle's fd closes.
    struct CdevHandle(LineHandle);

    impl InputLine for CdevHandle {
        fn read_value(&self) -> Result<Level, GpioError> {
            self.0
                .get_value()
                .map(Level::from_raw)
                .map_err(|err| GpioError::Backend(err.to_string()))
        }
    }

    impl OutputLine for CdevHandle {
        fn set_value(&mut self, value: Level) -> Result<(), GpioError> {
            self.0.set_value(value.as_raw()).map_err(|err| GpioError::Backend(err.to_string()))
        }
    }
}

impl GpioController for LiveGpioController {
    #[cfg(target_os = "linux")]
    fn open(&self, path: &Path) -> Result<Box<dyn GpioChip>, GpioError> {
        let chip = gpio_cdev::Chip::new(path).map_err(|err| {
            log::debug!("opening {} failed: {err}", path.display());
            GpioError::ChipUnavailable(path.to_path_buf())
        })?;
        Ok(Box::new(cdev::CdevChip(chip)))
    }

    #[cfg(not(target_os = "linux"))]
    fn open(&self, path: &Path) -> Result<Box<dyn GpioChip>, GpioError> {
        log::debug!("GPIO character devices are only available on Linux");
        Err(GpioError::ChipUnavailable(path.to_path_buf()))
    }
}
