//! `gpio-hilos run` command: the full button-gated demo.

use crate::config::Settings;
use crate::context::AppContext;
use crate::gate::{Gate, GateError};
use crate::runner::{run_concurrent, run_sequential, RunTiming};
use crate::say;
use crate::workload::Workload;

/// What a completed run measured.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Button samples taken before the press was seen.
    pub polls: u64,
    /// Sequential timing.
    pub sequential: RunTiming,
    /// Two-thread timing.
    pub concurrent: RunTiming,
}

/// Claim the hardware, wait for the button, run both modes, light the LED.
///
/// # Errors
///
/// Returns a [`GateError`] if the chip or either line cannot be set up, or
/// if the button or LED fails afterwards. Anything already claimed is
/// released before returning.
pub fn run_with_context(ctx: &AppContext, settings: &Settings) -> Result<RunSummary, GateError> {
    let console = &ctx.console;
    let mut gate = Gate::new(ctx.gpio.as_ref(), &settings.gpio).open()?;

    say!(console, "Esperando señal de inicio (presiona el switch)...");
    let polls = gate.wait_for_press()?;
    say!(console, "Switch presionado. Iniciando tareas...\n");

    let work = Workload::new(console, &settings.workload);
    let sequential = run_sequential(&work);
    let concurrent = run_concurrent(&work);

    gate.light_led()?;
    say!(console, "\n[LED encendido] Las tareas finalizaron correctamente.");
    gate.release();

    Ok(RunSummary { polls, sequential, concurrent })
}
