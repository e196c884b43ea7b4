use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = pconf_cli::cli().get_matches();
    pconf_cli::logging::init(matches.get_flag("verbose"));

    let mut stdout = std::io::stdout().lock();
    match pconf_cli::run(&matches, &mut stdout) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
