//! Recording adapter for the GPIO port.

use std::path::Path;

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::ports::gpio::{GpioChip, GpioController, GpioError, GpioLine, InputLine, Level, OutputLine};

const PORT: &str = "gpio";

/// Records GPIO interactions while delegating to an inner controller.
///
/// Chips and lines opened through it are wrapped as well, so the whole
/// session lands in one cassette in call order.
pub struct RecordingGpio {
    inner: Box<dyn GpioController>,
    recorder: SharedRecorder,
}

impl RecordingGpio {
    /// Creates a recording controller wrapping `inner`.
    pub fn new(inner: Box<dyn GpioController>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct OpenInput<'a> {
    path: &'a Path,
}

#[derive(Serialize)]
struct LineInput {
    offset: u32,
}

#[derive(Serialize)]
struct RequestInput<'a> {
    offset: u32,
    consumer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial: Option<Level>,
}

#[derive(Serialize)]
struct SetInput {
    offset: u32,
    value: Level,
}

fn unit<T>(result: &Result<T, GpioError>) -> Result<(), &GpioError> {
    result.as_ref().map(|_| ())
}

impl GpioController for RecordingGpio {
    fn open(&self, path: &Path) -> Result<Box<dyn GpioChip>, GpioError> {
        let result = self.inner.open(path);
        record_result(&self.recorder, PORT, "open", &OpenInput { path }, &unit(&result));
        let chip = result?;
        Ok(Box::new(RecordingChip { inner: chip, recorder: self.recorder.clone() }))
    }
}

struct RecordingChip {
    inner: Box<dyn GpioChip>,
    recorder: SharedRecorder,
}

impl GpioChip for RecordingChip {
    fn get_line(&mut self, offset: u32) -> Result<Box<dyn GpioLine>, GpioError> {
        let result = self.inner.get_line(offset);
        record_result(&self.recorder, PORT, "get_line", &LineInput { offset }, &unit(&result));
        Ok(Box::new(RecordingLine { inner: result?, recorder: self.recorder.clone() }))
    }
}

struct RecordingLine {
    inner: Box<dyn GpioLine>,
    recorder: SharedRecorder,
}

impl GpioLine for RecordingLine {
    fn offset(&self) -> u32 {
        self.inner.offset()
    }

    fn request_input(self: Box<Self>, consumer: &str) -> Result<Box<dyn InputLine>, GpioError> {
        let offset = self.inner.offset();
        let result = self.inner.request_input(consumer);
        let input = RequestInput { offset, consumer, initial: None };
        record_result(&self.recorder, PORT, "request_input", &input, &unit(&result));
        Ok(Box::new(RecordingInput { offset, inner: result?, recorder: self.recorder }))
    }

    fn request_output(
        self: Box<Self>,
        consumer: &str,
        initial: Level,
    ) -> Result<Box<dyn OutputLine>, GpioError> {
        let offset = self.inner.offset();
        let result = self.inner.request_output(consumer, initial);
        let input = RequestInput { offset, consumer, initial: Some(initial) };
        record_result(&self.recorder, PORT, "request_output", &input, &unit(&result));
        Ok(Box::new(RecordingOutput { offset, inner: result?, recorder: self.recorder }))
    }
}

struct RecordingInput {
    offset: u32,
    inner: Box<dyn InputLine>,
    recorder: SharedRecorder,
}

impl InputLine for RecordingInput {
    fn read_value(&self) -> Result<Level, GpioError> {
        let result = self.inner.read_value();
        let input = LineInput { offset: self.offset };
        record_result(&self.recorder, PORT, "read_value", &input, &result);
        result
    }
}

struct RecordingOutput {
    offset: u32,
    inner: Box<dyn OutputLine>,
    recorder: SharedRecorder,
}

impl OutputLine for RecordingOutput {
    fn set_value(&mut self, value: Level) -> Result<(), GpioError> {
        let result = self.inner.set_value(value);
        let input = SetInput { offset: self.offset, value };
        record_result(&self.recorder, PORT, "set_value", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::adapters::simulated::{Scenario, SimulatedGpio};
    use crate::cassette::format::Cassette;
    use crate::cassette::recorder::CassetteRecorder;

    #[test]
    fn records_full_session_in_call_order() {
        let dir = std::env::temp_dir().join("gpio_hilos_rec_gpio_test");
        let path = dir.join("gpio.cassette.yaml");
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "/dev/gpiochip0")));

        {
            let gpio = RecordingGpio::new(
                Box::new(SimulatedGpio::new(Scenario::PressAfter(1))),
                Arc::clone(&recorder),
            );
            let mut chip = gpio.open(Path::new("/dev/gpiochip0")).unwrap();
            let button = chip.get_line(17).unwrap().request_input("programa").unwrap();
            assert_eq!(button.read_value().unwrap(), Level::Low);
            assert_eq!(button.read_value().unwrap(), Level::High);
            let mut led = chip.get_line(27).unwrap().request_output("programa", Level::Low).unwrap();
            led.set_value(Level::High).unwrap();
        }

        recorder.lock().unwrap().write().unwrap();
        let cassette = Cassette::load(&path).unwrap();
        let methods: Vec<&str> = cassette.interactions.iter().map(|i| i.method.as_str()).collect();
        assert_eq!(
            methods,
            [
                "open",
                "get_line",
                "request_input",
                "read_value",
                "read_value",
                "get_line",
                "request_output",
                "set_value"
            ]
        );
        assert_eq!(cassette.interactions[4].output, json!({"ok": "high"}));
        assert_eq!(
            cassette.interactions[6].input,
            json!({"offset": 27, "consumer": "programa", "initial": "low"})
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn records_failed_open() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused.yaml", "t", "x")));
        let gpio = RecordingGpio::new(
            Box::new(SimulatedGpio::new(Scenario::MissingChip)),
            Arc::clone(&recorder),
        );
        assert!(gpio.open(Path::new("/dev/gpiochip9")).is_err());

        let guard = recorder.lock().unwrap();
        let open = &guard.interactions()[0];
        assert_eq!(open.input, json!({"path": "/dev/gpiochip9"}));
        assert!(open.output.get("err").is_some());
    }
}
