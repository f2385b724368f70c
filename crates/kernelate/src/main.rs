use kernelate::{error_chain, run, CliArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: CliArgs = argh::from_env();

    if let Err(e) = run(&args) {
        for (depth, cause) in error_chain(e.as_ref()).iter().enumerate() {
            match depth {
                0 => log::error!("{cause}"),
                _ => log::error!("caused by: {cause}"),
            }
        }
        std::process::exit(1);
    }
}
