use std::process::exit;

fn main() {
    let code = tubesim_cli::run(
        std::env::args(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    exit(code);
}
