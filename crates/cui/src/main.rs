use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // warnings only: the alternate screen would be scribbled over by anything chattier
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    rankguess_cui::run_with_args(&args)
}
