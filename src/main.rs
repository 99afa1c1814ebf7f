//! Binary entrypoint for the `gpio-hilos` CLI.

use std::process::ExitCode;

use gpio_hilos::Error;

fn main() -> ExitCode {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    gpio_hilos::init_logging();

    match gpio_hilos::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Cli(err)) => err.exit(),
        Err(err) => {
            for cause in err.chain().iter().skip(1) {
                log::debug!("caused by: {cause}");
            }
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
