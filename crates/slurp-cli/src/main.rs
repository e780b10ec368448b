mod cli;

fn main() {
    std::process::exit(cli::run_from_args());
}
