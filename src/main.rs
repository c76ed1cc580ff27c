fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = xptest::cli::Args::parse();
    let verbosity = xptest::Verbosity::from_flags(args.verbose, args.extra_verbose);
    xptest::cli::init_logger(verbosity);
    if let Err(e) = xptest::cli::run(&args) {
        eprintln!("{}", e);
        if verbosity >= xptest::Verbosity::Verbose {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
