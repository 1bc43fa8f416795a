#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = mwl_demo::run_from_env() {
        eprintln!("mwl: {error}");
        std::process::exit(error.exit_code());
    }
}
